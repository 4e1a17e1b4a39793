use std::fmt::{Display, Formatter, Result as FmtResult};

/// Header line of the warning report.
pub const REPORT_HEADER: &str = "-------Warning:-------";

/// Append-only list of problems that did not stop the run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarningLog {
    messages: Vec<String>,
}
impl WarningLog {
    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }
}

/// Renders the end-of-run report: the header, then one line per warning.
impl Display for WarningLog {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{REPORT_HEADER}")?;
        for message in &self.messages {
            write!(f, "\n{message}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report() {
        let mut log = WarningLog::default();
        assert_eq!(log.to_string(), REPORT_HEADER);

        log.push("Package 'a' cannot be downloaded");
        log.push(String::from("Package 'b' cannot be downloaded"));
        assert_eq!(log.len(), 2);
        assert_eq!(
            log.to_string(),
            "-------Warning:-------\nPackage 'a' cannot be downloaded\nPackage 'b' cannot be downloaded"
        );
        assert_eq!(log.iter().next(), Some("Package 'a' cannot be downloaded"));
    }
}
