//! In-memory form of a generated verifier file.
//!
//! Composers never produce text directly: they fill a [`Document`] through
//! the [`Builder`] and the printer renders the verifier grammar from it.

mod builder;
mod printer;

pub use builder::{Builder, ProcBuilder};

use std::fmt;

use serde::Serialize;

use crate::params::Params;
use crate::share::{Key, Name, Operand};

/// Right hand side of an assignment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Expr {
    Copy(Operand),
    Add(Operand, Operand),
    Mul(Operand, Operand),
}

impl Expr {
    pub fn copy<A: Into<Operand>>(a: A) -> Self {
        Expr::Copy(a.into())
    }

    pub fn add<A: Into<Operand>, B: Into<Operand>>(a: A, b: B) -> Self {
        Expr::Add(a.into(), b.into())
    }

    pub fn mul<A: Into<Operand>, B: Into<Operand>>(a: A, b: B) -> Self {
        Expr::Mul(a.into(), b.into())
    }

    pub fn operands(&self) -> impl Iterator<Item = &Operand> {
        let (a, b) = match self {
            Expr::Copy(a) => (a, None),
            Expr::Add(a, b) | Expr::Mul(a, b) => (a, Some(b)),
        };
        std::iter::once(a).chain(b)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Stmt {
    /// `dst := expr;`
    Assign { dst: Operand, expr: Expr },
    /// `(outputs) = gadget(inputs);`
    Call {
        outputs: Vec<Key>,
        gadget: &'static str,
        inputs: Vec<Key>,
    },
    /// `(* text *)`
    Comment(String),
}

/// A gadget: declared inputs, outputs, consumed randoms, locals and body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Proc {
    pub name: &'static str,
    pub description: Option<&'static str>,
    pub inputs: Vec<Key>,
    pub outputs: Vec<Key>,
    pub randoms: Vec<Name>,
    pub shares: Vec<Key>,
    pub body: Vec<Stmt>,
}

impl Proc {
    /// Number of instantiations of `gadget` in the body.
    pub fn calls_to(&self, gadget: &str) -> usize {
        self.calls().filter(|(name, _, _)| *name == gadget).count()
    }

    /// Iterates `(gadget, outputs, inputs)` of every call in the body.
    pub fn calls(&self) -> impl Iterator<Item = (&'static str, &[Key], &[Key])> {
        self.body.iter().filter_map(|stmt| match stmt {
            Stmt::Call {
                outputs,
                gadget,
                inputs,
            } => Some((*gadget, &outputs[..], &inputs[..])),
            _ => None,
        })
    }

    pub fn statements(&self) -> usize {
        self.body
            .iter()
            .filter(|stmt| !matches!(stmt, Stmt::Comment(_)))
            .count()
    }
}

/// Probing-security property the verifier is asked to check.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Property {
    Ni,
    Sni,
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Property::Ni => f.write_str("NI"),
            Property::Sni => f.write_str("SNI"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Claim {
    pub property: Property,
    pub target: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct Document {
    pub params: Params,
    pub procs: Vec<Proc>,
    pub claims: Vec<Claim>,
}

impl Document {
    pub fn proc(&self, name: &str) -> Option<&Proc> {
        self.procs.iter().find(|p| p.name == name)
    }

    pub fn masking(&self) -> usize {
        self.params.masking
    }

    /// Renders the document in the verifier grammar.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Hash of the rendered text, for comparing against known-good gadget sets.
    pub fn digest(&self) -> blake3::Hash {
        blake3::hash(self.render().as_bytes())
    }

    /// Binary encoding of the structured document.
    pub fn serialize(&self) -> bincode::Result<Vec<u8>> {
        bincode::serialize(self)
    }
}
