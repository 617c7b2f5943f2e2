use std::fmt;

/// Status reported for a probe that confirmed unrestricted connectivity.
pub const SUCCESS_CODE: u16 = 204;

/// Status reported for a probe that could not reach a verdict.
pub const FAILED_CODE: u16 = 599;

/// Verdict derived from a probe's status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeClass {
    /// The endpoint answered with the success sentinel: internet is available.
    Successful,
    /// Something in between answered 2xx/3xx instead: a captive portal.
    Portal,
    /// Timeout, transport error, 4xx/5xx or the failed sentinel.
    Failed,
}

impl ProbeClass {
    pub fn of(status_code: u16) -> Self {
        if status_code == SUCCESS_CODE {
            ProbeClass::Successful
        } else if (200..=399).contains(&status_code) {
            ProbeClass::Portal
        } else {
            ProbeClass::Failed
        }
    }
}

/// Outcome of a single probe attempt.
///
/// Built once at the end of an HTTP exchange and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    status_code: u16,
    redirect_target: Option<String>,
    probed_url: Option<String>,
}

impl ProbeOutcome {
    pub fn new(
        status_code: u16,
        redirect_target: Option<String>,
        probed_url: Option<String>,
    ) -> Self {
        Self {
            status_code,
            redirect_target,
            probed_url,
        }
    }

    /// The failed sentinel with no diagnostics attached.
    pub fn failed() -> Self {
        Self::new(FAILED_CODE, None, None)
    }

    /// The failed sentinel for a probe of `url`.
    pub fn failed_for(url: &str) -> Self {
        Self::new(FAILED_CODE, None, Some(url.to_string()))
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// `Location` header returned with the response, if any.
    pub fn redirect_target(&self) -> Option<&str> {
        self.redirect_target.as_deref()
    }

    pub fn probed_url(&self) -> Option<&str> {
        self.probed_url.as_deref()
    }

    pub fn class(&self) -> ProbeClass {
        ProbeClass::of(self.status_code)
    }

    pub fn is_successful(&self) -> bool {
        self.class() == ProbeClass::Successful
    }

    pub fn is_portal(&self) -> bool {
        self.class() == ProbeClass::Portal
    }

    pub fn is_failed(&self) -> bool {
        self.class() == ProbeClass::Failed
    }

    /// Successful or portal: either way the probe answered the question.
    pub fn is_conclusive(&self) -> bool {
        !self.is_failed()
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ProbeOutcome {{ status: {}, redirect: {}, url: {} }}",
            self.status_code,
            self.redirect_target.as_deref().unwrap_or("-"),
            self.probed_url.as_deref().unwrap_or("-"),
        )
    }
}
