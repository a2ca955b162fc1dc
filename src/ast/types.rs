//! Type lattice for SMCL.
//!
//! Every value in the language is either public or secret. The secret
//! variants are MPC-shared values and pair up with a public base:
//!
//! - `int` / `sint`
//! - `bool` / `sbool`
//! - `client` / `sclient`
//!
//! A secret type is accepted wherever its public base is required, but a
//! public type is never accepted where the secret refinement is required.
//! See [`SmclType::compatible`].

use std::fmt::Display;

/// Represents the semantic types known to the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SmclType {
    /// Placeholder for "no type", never the type of a well-typed node.
    None,
    Int,
    Sint,
    Bool,
    Sbool,
    String,
    Void,
    Client,
    Sclient,
    Server,
    Group,
    /// A channel and the type of the values it transports.
    Tunnel(Box<SmclType>),
}

impl SmclType {
    /// Returns the secret counterpart, or `None` if there isn't one.
    pub fn secret_of(&self) -> SmclType {
        match self {
            SmclType::Int => SmclType::Sint,
            SmclType::Bool => SmclType::Sbool,
            SmclType::Client => SmclType::Sclient,
            _ => SmclType::None,
        }
    }

    /// Returns the public counterpart, or `None` if there isn't one.
    pub fn public_of(&self) -> SmclType {
        match self {
            SmclType::Sint => SmclType::Int,
            SmclType::Sbool => SmclType::Bool,
            SmclType::Sclient => SmclType::Client,
            _ => SmclType::None,
        }
    }

    /// A type is secret iff it has a public counterpart.
    pub fn is_secret(&self) -> bool {
        self.public_of() != SmclType::None
    }

    /// Checks whether a value of type `self` may be used where `required` is
    /// expected.
    ///
    /// The rule is directional: `Sint` is compatible with a required `Int`,
    /// but `Int` is not compatible with a required `Sint`.
    pub fn compatible(&self, required: &SmclType) -> bool {
        if *self == SmclType::None {
            return false;
        }

        self == required || self.public_of() == *required
    }

    /// Whether values of this type may travel through a tunnel.
    pub fn is_tunnelable(&self) -> bool {
        matches!(
            self,
            SmclType::Int | SmclType::Sint | SmclType::Bool | SmclType::Sbool
        )
    }
}

impl Display for SmclType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SmclType::None => write!(f, "none"),
            SmclType::Int => write!(f, "int"),
            SmclType::Sint => write!(f, "sint"),
            SmclType::Bool => write!(f, "bool"),
            SmclType::Sbool => write!(f, "sbool"),
            SmclType::String => write!(f, "string"),
            SmclType::Void => write!(f, "void"),
            SmclType::Client => write!(f, "client"),
            SmclType::Sclient => write!(f, "sclient"),
            SmclType::Server => write!(f, "server"),
            SmclType::Group => write!(f, "group"),
            SmclType::Tunnel(inner) => write!(f, "tunnel of {}", inner),
        }
    }
}
