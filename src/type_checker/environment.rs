//! Environments the analyzer builds while walking a program.
//!
//! The global environment holds one [`PartEnvironment`] per client and one
//! for the server. Each part owns the functions declared in it, and each
//! function owns a flat symbol table: blocks do not open new scopes.

use std::collections::HashMap;

use crate::ast::{ast::Function, types::SmclType};

/// Identifies a registered part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartId {
    Client(usize),
    Server,
}

/// Where the analyzer currently is.
///
/// Threaded by value through the recursion; narrowing it for a nested check
/// never needs restoring.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub part: PartId,
    pub function: &'a str,
    /// Client whose function a method invocation is calling.
    pub invoking_on: Option<usize>,
}

impl<'a> Scope<'a> {
    pub fn new(part: PartId, function: &'a str) -> Self {
        Scope {
            part,
            function,
            invoking_on: None,
        }
    }

    pub fn invoking(self, client: usize) -> Self {
        Scope {
            invoking_on: Some(client),
            ..self
        }
    }

    pub fn caller(self) -> Self {
        Scope {
            invoking_on: None,
            ..self
        }
    }

    /// The part a call made from this scope resolves in.
    pub fn call_target(&self) -> PartId {
        match self.invoking_on {
            Some(client) => PartId::Client(client),
            None => self.part,
        }
    }
}

#[derive(Debug)]
pub enum PartKind {
    Client {
        /// Tunnel name to transported type.
        tunnels: HashMap<String, SmclType>,
    },
    Server {
        /// Group alias to the index of the client it names.
        groups: HashMap<String, usize>,
    },
}

#[derive(Debug)]
pub struct PartEnvironment<'a> {
    pub name: String,
    pub functions: HashMap<String, FunctionEnvironment<'a>>,
    pub kind: PartKind,
}

impl<'a> PartEnvironment<'a> {
    pub fn client(name: &str) -> Self {
        PartEnvironment {
            name: name.to_string(),
            functions: HashMap::new(),
            kind: PartKind::Client {
                tunnels: HashMap::new(),
            },
        }
    }

    pub fn server(name: &str) -> Self {
        PartEnvironment {
            name: name.to_string(),
            functions: HashMap::new(),
            kind: PartKind::Server {
                groups: HashMap::new(),
            },
        }
    }

    pub fn tunnel(&self, name: &str) -> Option<&SmclType> {
        match &self.kind {
            PartKind::Client { tunnels } => tunnels.get(name),
            PartKind::Server { .. } => None,
        }
    }

    pub fn group(&self, alias: &str) -> Option<usize> {
        match &self.kind {
            PartKind::Server { groups } => groups.get(alias).copied(),
            PartKind::Client { .. } => None,
        }
    }
}

#[derive(Debug)]
pub struct FunctionEnvironment<'a> {
    pub function: &'a Function,
    pub symbol_table: HashMap<String, SmclType>,
    /// Loop variables bound to the client their group names.
    pub id_to_client: HashMap<String, usize>,
}

impl<'a> FunctionEnvironment<'a> {
    pub fn new(function: &'a Function) -> Self {
        FunctionEnvironment {
            function,
            symbol_table: HashMap::new(),
            id_to_client: HashMap::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct GlobalEnvironment<'a> {
    pub clients: Vec<PartEnvironment<'a>>,
    pub server: Option<PartEnvironment<'a>>,
}

impl<'a> GlobalEnvironment<'a> {
    pub fn find_client(&self, name: &str) -> Option<usize> {
        self.clients.iter().position(|client| client.name == name)
    }

    pub fn part(&self, id: PartId) -> Option<&PartEnvironment<'a>> {
        match id {
            PartId::Client(index) => self.clients.get(index),
            PartId::Server => self.server.as_ref(),
        }
    }

    pub fn part_mut(&mut self, id: PartId) -> Option<&mut PartEnvironment<'a>> {
        match id {
            PartId::Client(index) => self.clients.get_mut(index),
            PartId::Server => self.server.as_mut(),
        }
    }

    pub fn function(&self, scope: &Scope) -> Option<&FunctionEnvironment<'a>> {
        self.part(scope.part)?.functions.get(scope.function)
    }

    pub fn function_mut(&mut self, scope: &Scope) -> Option<&mut FunctionEnvironment<'a>> {
        self.part_mut(scope.part)?.functions.get_mut(scope.function)
    }
}
