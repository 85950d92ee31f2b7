//! `{$name}` variable substitution.

use crate::model::Define;
use streamforge_common::Diagnostic;

fn is_identifier_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-'
}

/// Replace every `{$identifier}` in `input` with its binding.
///
/// Unbound identifiers are reported through `warn` and left verbatim.
pub fn substitute(input: &str, define: &Define, mut warn: impl FnMut(Diagnostic)) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find("{$") {
        output.push_str(&rest[..open]);
        let candidate = &rest[open + 2..];
        let length = candidate
            .bytes()
            .take_while(|&b| is_identifier_byte(b))
            .count();

        if length == 0 || candidate.as_bytes().get(length) != Some(&b'}') {
            output.push_str("{$");
            rest = candidate;
            continue;
        }

        let identifier = &candidate[..length];
        match define.lookup(identifier) {
            Some(value) => output.push_str(value),
            None => {
                warn(Diagnostic::UnresolvedVariable {
                    name: identifier.to_string(),
                });
                output.push_str(&rest[open..open + 3 + length]);
            }
        }
        rest = &candidate[length + 1..];
    }

    output.push_str(rest);
    output
}
