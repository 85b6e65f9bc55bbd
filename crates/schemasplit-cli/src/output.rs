//! Output formatting utilities for CLI commands.

use std::io::Write;

use serde::Serialize;

use crate::error::CliError;

/// Trait for types that can be formatted for output
pub trait FormattedOutput {
    fn format_text(&self) -> String;

    fn format_json(&self) -> Result<String, serde_json::Error>
    where
        Self: Serialize,
    {
        serde_json::to_string_pretty(self)
    }
}

/// Print formatted output to stdout
pub fn print_output<T>(json: bool, value: &T) -> Result<(), CliError>
where
    T: FormattedOutput + Serialize,
{
    write_output(json, value, std::io::stdout().lock())
}

/// Print formatted output to a writer
pub fn write_output<T, W>(json: bool, value: &T, mut writer: W) -> Result<(), CliError>
where
    T: FormattedOutput + Serialize,
    W: Write,
{
    let output = if json {
        value.format_json()?
    } else {
        value.format_text()
    };

    writeln!(writer, "{output}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Status {
        ok: bool,
    }

    impl FormattedOutput for Status {
        fn format_text(&self) -> String {
            if self.ok { "ok" } else { "failed" }.to_string()
        }
    }

    #[test]
    fn test_text_output() {
        let mut buf = Vec::new();
        write_output(false, &Status { ok: true }, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "ok\n");
    }

    #[test]
    fn test_json_output() {
        let mut buf = Vec::new();
        write_output(true, &Status { ok: false }, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "{\n  \"ok\": false\n}\n");
    }
}
