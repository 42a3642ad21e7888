//! Report types and delivery
//!
//! A completed batch of check executions is a list of [`CheckReport`]
//! tuples. Reporters consume a batch; the engine only guarantees the batch
//! is complete and ordered, delivery policy beyond "only failures or
//! everything" lives with the reporter.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};
use vigil_core::{CheckContext, Error, MailTransport, Outcome, Resources, Result, Status};

/// One executed check, with the identification needed for reporting
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub id: String,
    pub suite: String,
    pub label: String,
    pub outcome: Outcome,
    pub finished_at: DateTime<Utc>,
}

impl CheckReport {
    /// Run `context` and capture the result
    pub fn capture(context: &CheckContext) -> Self {
        let outcome = context.run();
        Self {
            id: context.id().to_string(),
            suite: context.suite().to_string(),
            label: context.label().to_string(),
            outcome,
            finished_at: Utc::now(),
        }
    }
}

/// Delivers a completed batch of reports
pub trait Reporter: Send + Sync {
    fn deliver(&self, reports: &[CheckReport]) -> Result<()>;
}

/// Logs each report through tracing
pub struct LogReporter {
    only_failures: bool,
}

impl LogReporter {
    pub fn new(only_failures: bool) -> Self {
        Self { only_failures }
    }
}

impl Reporter for LogReporter {
    fn deliver(&self, reports: &[CheckReport]) -> Result<()> {
        for report in reports {
            match report.outcome.status() {
                Status::Failure => error!(
                    suite = %report.suite,
                    id = %report.id,
                    "{}: {}",
                    report.label,
                    report.outcome.message()
                ),
                Status::Success | Status::Skip if !self.only_failures => info!(
                    suite = %report.suite,
                    id = %report.id,
                    "{}: {}",
                    report.label,
                    report.outcome
                ),
                _ => {}
            }
        }
        Ok(())
    }
}

/// Sends a summary mail per batch through a [`MailTransport`] resource
pub struct MailReporter {
    transport: Arc<dyn MailTransport>,
    recipients: Vec<String>,
    only_failures: bool,
}

impl MailReporter {
    pub fn new(
        transport: Arc<dyn MailTransport>,
        recipients: Vec<String>,
        only_failures: bool,
    ) -> Self {
        Self {
            transport,
            recipients,
            only_failures,
        }
    }
}

impl Reporter for MailReporter {
    fn deliver(&self, reports: &[CheckReport]) -> Result<()> {
        let failures = reports
            .iter()
            .filter(|r| r.outcome.is_failure())
            .count();
        if self.only_failures && failures == 0 {
            return Ok(());
        }

        let subject = if failures > 0 {
            format!("[vigil] {failures} check(s) failing")
        } else {
            String::from("[vigil] all checks passing")
        };
        let body: String = reports
            .iter()
            .map(|r| format!("[{}] {} ({}): {}\n", r.suite, r.label, r.id, r.outcome))
            .collect();

        for recipient in &self.recipients {
            self.transport.send(recipient, &subject, &body)?;
        }
        Ok(())
    }
}

/// Mail reporting settings, as declared in configuration
#[derive(Debug, Clone, Default)]
pub struct MailReportingOptions {
    pub enabled: bool,
    pub recipients: Vec<String>,
    pub only_failures: bool,
}

/// Assemble the reporters for a batch run.
///
/// A log reporter is always present. Enabling mail reporting without a
/// registered mail transport is a build-time error naming the missing
/// integration, not a silent no-op.
pub fn build_reporters(
    mail: &MailReportingOptions,
    resources: &Resources,
) -> Result<Vec<Box<dyn Reporter>>> {
    let mut reporters: Vec<Box<dyn Reporter>> = vec![Box::new(LogReporter::new(false))];

    if mail.enabled {
        if !resources.has_mail_transport() {
            return Err(Error::MissingIntegration {
                kind: String::from("mail transport"),
                hint: String::from(
                    "mail reporting is enabled but no mail transport is registered",
                ),
            });
        }
        reporters.push(Box::new(MailReporter::new(
            resources.mail_transport()?,
            mail.recipients.clone(),
            mail.only_failures,
        )));
    }

    Ok(reporters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<(String, String, String)>>,
    }

    impl MailTransport for RecordingTransport {
        fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<()> {
            self.sent.lock().unwrap().push((
                recipient.to_string(),
                subject.to_string(),
                body.to_string(),
            ));
            Ok(())
        }
    }

    fn report(id: &str, outcome: Outcome) -> CheckReport {
        CheckReport {
            id: id.to_string(),
            suite: String::from("default"),
            label: id.to_string(),
            outcome,
            finished_at: Utc::now(),
        }
    }

    #[test]
    fn test_mail_reporter_only_failures_suppresses_clean_batch() {
        let transport = Arc::new(RecordingTransport::default());
        let reporter = MailReporter::new(transport.clone(), vec![String::from("ops@example.com")], true);

        reporter
            .deliver(&[report("up", Outcome::success("ok"))])
            .unwrap();
        assert!(transport.sent.lock().unwrap().is_empty());

        reporter
            .deliver(&[
                report("up", Outcome::success("ok")),
                report("down", Outcome::failure("bad")),
            ])
            .unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (recipient, subject, body) = &sent[0];
        assert_eq!(recipient, "ops@example.com");
        assert_eq!(subject, "[vigil] 1 check(s) failing");
        assert!(body.contains("down"));
    }

    #[test]
    fn test_mail_enabled_without_transport_is_missing_integration() {
        let options = MailReportingOptions {
            enabled: true,
            recipients: vec![String::from("ops@example.com")],
            only_failures: true,
        };
        let err = build_reporters(&options, &Resources::new()).err().unwrap();
        assert!(matches!(err, Error::MissingIntegration { .. }));
    }

    #[test]
    fn test_mail_disabled_yields_log_reporter_only() {
        let reporters = build_reporters(&MailReportingOptions::default(), &Resources::new()).unwrap();
        assert_eq!(reporters.len(), 1);
    }
}
