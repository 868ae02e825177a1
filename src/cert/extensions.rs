//! Well-known OpenSSH certificate extensions and critical options.
//!
//! Certificates carry these as flat lists of names. Use [`Extension::as_str`] or
//! [`CriticalOption::as_str`] to fill [`CertificateInfo`](super::params::CertificateInfo) lists,
//! or pass any other string for vendor specific entries.
//!
//! # Example
//! ```
//! use sshcertkit::cert::extensions::{default_extensions, Extension};
//! let names = default_extensions();
//! assert!(names.contains(&Extension::PermitPty.as_str().to_string()));
//! assert_eq!(Extension::parse("permit-pty"), Some(Extension::PermitPty));
//! ```

use std::fmt;

/// Standard user certificate extensions defined by OpenSSH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extension {
    NoTouchRequired,
    PermitX11Forwarding,
    PermitAgentForwarding,
    PermitPortForwarding,
    PermitPty,
    PermitUserRc,
}

impl Extension {
    pub const ALL: [Extension; 6] = [
        Extension::NoTouchRequired,
        Extension::PermitX11Forwarding,
        Extension::PermitAgentForwarding,
        Extension::PermitPortForwarding,
        Extension::PermitPty,
        Extension::PermitUserRc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Extension::NoTouchRequired => "no-touch-required",
            Extension::PermitX11Forwarding => "permit-X11-forwarding",
            Extension::PermitAgentForwarding => "permit-agent-forwarding",
            Extension::PermitPortForwarding => "permit-port-forwarding",
            Extension::PermitPty => "permit-pty",
            Extension::PermitUserRc => "permit-user-rc",
        }
    }

    /// Looks up a standard extension by name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ext| ext.as_str() == name)
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standard critical options defined by OpenSSH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CriticalOption {
    ForceCommand,
    SourceAddress,
    VerifyRequired,
}

impl CriticalOption {
    pub const ALL: [CriticalOption; 3] = [
        CriticalOption::ForceCommand,
        CriticalOption::SourceAddress,
        CriticalOption::VerifyRequired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CriticalOption::ForceCommand => "force-command",
            CriticalOption::SourceAddress => "source-address",
            CriticalOption::VerifyRequired => "verify-required",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|opt| opt.as_str() == name)
    }
}

impl fmt::Display for CriticalOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The extensions `ssh-keygen` grants to user certificates when none are requested.
pub fn default_extensions() -> Vec<String> {
    [
        Extension::PermitX11Forwarding,
        Extension::PermitAgentForwarding,
        Extension::PermitPortForwarding,
        Extension::PermitPty,
        Extension::PermitUserRc,
    ]
    .iter()
    .map(|ext| ext.as_str().to_string())
    .collect()
}
