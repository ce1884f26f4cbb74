/// Encode arbitrary bytes as the body of a C++ string literal.
///
/// The result, placed between double quotes, denotes exactly the input byte
/// sequence. Control bytes, bytes above `0x7e`, and the template trigger
/// characters `$`, `@` and `` ` `` are kept out of the literal via `\xHH`
/// escapes; `"`, `\` and the usual control characters use their two-character
/// escapes.
pub fn encode_literal(bytes: impl AsRef<[u8]>) -> String {
	let bytes = bytes.as_ref();
	let mut output = String::with_capacity(bytes.len() + bytes.len() / 4);
	let mut hex_escape = false;

	for &byte in bytes {
		match byte {
			b'"' => output.push_str("\\\""),
			b'\\' => output.push_str("\\\\"),
			0x07 => output.push_str("\\a"),
			0x08 => output.push_str("\\b"),
			0x0c => output.push_str("\\f"),
			b'\n' => output.push_str("\\n"),
			b'\r' => output.push_str("\\r"),
			b'\t' => output.push_str("\\t"),
			0x0b => output.push_str("\\v"),
			byte if byte < 0x20 || byte > 0x7e || byte == b'$' || byte == b'@' || byte == b'`' => {
				output.push_str(&format!("\\x{byte:02x}"));
				hex_escape = true;
				continue;
			}
			byte => {
				if hex_escape && byte.is_ascii_hexdigit() {
					// A hex escape extends greedily over following hex
					// digits; adjacent-literal concatenation terminates it.
					output.push_str("\"\"");
				}
				output.push(byte as char);
			}
		}
		hex_escape = false;
	}

	output
}
