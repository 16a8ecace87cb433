//! Static problem type catalog.
//!
//! Every failure the API can report maps to exactly one entry here, so the
//! status, title and machine-readable code of a failure are decided in one place.

use http::StatusCode;

use crate::problem::Problem;

const TYPE_BASE: &str = "urn:calculator:problem:";

/// Static error definition from the catalog.
#[derive(Debug, Clone, Copy)]
pub struct ErrDef {
    pub status: u16,
    pub title: &'static str,
    pub code: &'static str,
}

impl ErrDef {
    /// Convert this error definition into a Problem with the given detail.
    #[inline]
    pub fn as_problem(&self, detail: impl Into<String>) -> Problem {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Problem::new(status, self.title, detail)
            .with_code(self.code)
            .with_type(format!("{TYPE_BASE}{}", self.code.to_ascii_lowercase()))
    }
}

pub const NOT_FOUND: ErrDef = ErrDef {
    status: 404,
    title: "Not Found",
    code: "NOT_FOUND",
};

pub const INVALID_REQUEST: ErrDef = ErrDef {
    status: 400,
    title: "Bad Request",
    code: "INVALID_REQUEST",
};

pub const METHOD_NOT_ALLOWED: ErrDef = ErrDef {
    status: 405,
    title: "Method Not Allowed",
    code: "METHOD_NOT_ALLOWED",
};

pub const CONTRACT_VIOLATION: ErrDef = ErrDef {
    status: 500,
    title: "Internal Server Error",
    code: "CONTRACT_VIOLATION",
};

pub const TIMEOUT: ErrDef = ErrDef {
    status: 504,
    title: "Gateway Timeout",
    code: "TIMEOUT",
};

pub const INTERNAL: ErrDef = ErrDef {
    status: 500,
    title: "Internal Server Error",
    code: "INTERNAL",
};
