use std::collections::{HashMap, HashSet};

use log::trace;

use super::{Claim, Document, Expr, Proc, Property, Stmt};
use crate::params::Params;
use crate::share::{Key, Name, Operand};

/// Accumulates procedures and claims into a [`Document`].
///
/// All consistency checks happen here, while the document is composed:
/// a composer that redeclares a name, reads something it never declared,
/// or calls a gadget with the wrong arity panics immediately.
pub struct Builder {
    document: Document,
}

impl Builder {
    pub fn new(params: Params) -> Self {
        Builder {
            document: Document {
                params,
                procs: Vec::new(),
                claims: Vec::new(),
            },
        }
    }

    pub fn params(&self) -> &Params {
        &self.document.params
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn begin_proc(&mut self, name: &'static str) -> ProcBuilder<'_> {
        assert!(
            self.document.proc(name).is_none(),
            "procedure {} defined twice",
            name
        );
        ProcBuilder {
            builder: self,
            proc: Proc {
                name,
                description: None,
                inputs: Vec::new(),
                outputs: Vec::new(),
                randoms: Vec::new(),
                shares: Vec::new(),
                body: Vec::new(),
            },
            declared: HashMap::new(),
            bound: HashSet::new(),
        }
    }

    pub fn claim(&mut self, property: Property, target: &'static str) {
        assert!(
            self.document.proc(target).is_some(),
            "claim on undefined procedure {}",
            target
        );
        self.document.claims.push(Claim { property, target });
    }

    pub fn finish(self) -> Document {
        self.document
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Decl {
    Input,
    Output,
    Random,
    Share,
}

/// Builder for the procedure currently being composed.
pub struct ProcBuilder<'a> {
    builder: &'a mut Builder,
    proc: Proc,
    declared: HashMap<Name, Decl>,
    // scalar temporaries bound by an earlier assignment
    bound: HashSet<Name>,
}

impl<'a> ProcBuilder<'a> {
    pub fn masking(&self) -> usize {
        self.builder.params().masking
    }

    pub fn describe(&mut self, description: &'static str) -> &mut Self {
        self.proc.description = Some(description);
        self
    }

    fn declare(&mut self, name: Name, decl: Decl) {
        let previous = self.declared.insert(name, decl);
        assert!(
            previous.is_none(),
            "{} declared twice in {}",
            name,
            self.proc.name
        );
    }

    pub fn declare_input(&mut self, key: Key) -> &mut Self {
        self.declare(key.into(), Decl::Input);
        self.proc.inputs.push(key);
        self
    }

    pub fn declare_output(&mut self, key: Key) -> &mut Self {
        self.declare(key.into(), Decl::Output);
        self.proc.outputs.push(key);
        self
    }

    pub fn declare_share(&mut self, key: Key) -> &mut Self {
        self.declare(key.into(), Decl::Share);
        self.proc.shares.push(key);
        self
    }

    pub fn declare_random(&mut self, name: Name) -> &mut Self {
        assert!(!name.is_sharing(), "random {} must be a scalar", name);
        self.declare(name, Decl::Random);
        self.proc.randoms.push(name);
        self
    }

    pub fn declare_inputs<I: IntoIterator<Item = Key>>(&mut self, keys: I) -> &mut Self {
        for key in keys {
            self.declare_input(key);
        }
        self
    }

    pub fn declare_outputs<I: IntoIterator<Item = Key>>(&mut self, keys: I) -> &mut Self {
        for key in keys {
            self.declare_output(key);
        }
        self
    }

    pub fn declare_shares<I: IntoIterator<Item = Key>>(&mut self, keys: I) -> &mut Self {
        for key in keys {
            self.declare_share(key);
        }
        self
    }

    pub fn declare_randoms<I: IntoIterator<Item = Name>>(&mut self, names: I) -> &mut Self {
        for name in names {
            self.declare_random(name);
        }
        self
    }

    fn check_index(&self, operand: &Operand) {
        if let Some(index) = operand.index {
            assert!(
                operand.name.is_sharing(),
                "{} indexes the scalar {} in {}",
                operand,
                operand.name,
                self.proc.name
            );
            assert!(
                index <= self.masking(),
                "share index of {} exceeds the masking order in {}",
                operand,
                self.proc.name
            );
        }
    }

    fn check_read(&self, operand: &Operand) {
        self.check_index(operand);
        assert!(
            self.declared.contains_key(&operand.name) || self.bound.contains(&operand.name),
            "{} is read before being declared or bound in {}",
            operand,
            self.proc.name
        );
    }

    fn check_write(&mut self, operand: &Operand) {
        self.check_index(operand);
        match self.declared.get(&operand.name) {
            Some(Decl::Output) | Some(Decl::Share) => (),
            Some(decl) => panic!(
                "{} is assigned but declared as {:?} in {}",
                operand, decl, self.proc.name
            ),
            None => {
                // only scalar temporaries are bound implicitly
                assert!(
                    !operand.name.is_sharing(),
                    "sharing {} is assigned without a declaration in {}",
                    operand,
                    self.proc.name
                );
                self.bound.insert(operand.name);
            }
        }
    }

    pub fn add_statement(&mut self, stmt: Stmt) -> &mut Self {
        match &stmt {
            Stmt::Assign { dst, expr } => {
                for operand in expr.operands() {
                    self.check_read(operand);
                }
                self.check_write(dst);
            }
            Stmt::Call {
                outputs,
                gadget,
                inputs,
            } => {
                let callee = self
                    .builder
                    .document()
                    .proc(gadget)
                    .unwrap_or_else(|| panic!("call to undefined gadget {}", gadget));
                assert_eq!(
                    (callee.inputs.len(), callee.outputs.len()),
                    (inputs.len(), outputs.len()),
                    "arity mismatch calling {} from {}",
                    gadget,
                    self.proc.name
                );
                for input in inputs.iter() {
                    self.check_read(&Operand::from(*input));
                }
                for output in outputs.iter() {
                    self.check_write(&Operand::from(*output));
                }
            }
            Stmt::Comment(_) => (),
        }
        self.proc.body.push(stmt);
        self
    }

    /// `dst := expr;`
    pub fn assign<D: Into<Operand>>(&mut self, dst: D, expr: Expr) -> &mut Self {
        self.add_statement(Stmt::Assign {
            dst: dst.into(),
            expr,
        })
    }

    /// `(outputs) = gadget(inputs);`
    pub fn call(&mut self, outputs: Vec<Key>, gadget: &'static str, inputs: Vec<Key>) -> &mut Self {
        self.add_statement(Stmt::Call {
            outputs,
            gadget,
            inputs,
        })
    }

    /// `(* text *)`
    pub fn note<S: Into<String>>(&mut self, text: S) -> &mut Self {
        self.add_statement(Stmt::Comment(text.into()))
    }

    pub fn end_proc(self) {
        trace!(
            "{}: {} inputs, {} outputs, {} randoms, {} statements",
            self.proc.name,
            self.proc.inputs.len(),
            self.proc.outputs.len(),
            self.proc.randoms.len(),
            self.proc.statements()
        );
        self.builder.document.procs.push(self.proc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share::Pair;

    fn builder() -> Builder {
        Builder::new(Params::default())
    }

    fn identity(builder: &mut Builder) {
        let mut proc = builder.begin_proc("ID");
        proc.declare_input(Key::new("x")).declare_output(Key::new("y"));
        proc.assign(Key::new("y"), Expr::copy(Key::new("x")));
        proc.end_proc();
    }

    #[test]
    fn test_scalar_binding() {
        let mut builder = builder();
        let mut proc = builder.begin_proc("T");
        proc.declare_inputs(vec![Key::new("a"), Key::new("b")])
            .declare_output(Key::new("c"));
        proc.assign(Name::Product(0, 1), Expr::mul(Key::new("a").at(0), Key::new("b").at(1)));
        proc.assign(Key::new("c").at(0), Expr::copy(Name::Product(0, 1)));
        proc.end_proc();
        assert_eq!(builder.finish().procs[0].statements(), 2);
    }

    #[test]
    #[should_panic(expected = "declared twice")]
    fn test_redeclaration() {
        let mut builder = builder();
        let mut proc = builder.begin_proc("T");
        proc.declare_input(Key::new("x")).declare_share(Key::new("x"));
    }

    #[test]
    #[should_panic(expected = "read before being declared")]
    fn test_undeclared_read() {
        let mut builder = builder();
        let mut proc = builder.begin_proc("T");
        proc.declare_output(Key::new("y"));
        proc.assign(Key::new("y"), Expr::copy(Key::new("x")));
    }

    #[test]
    #[should_panic(expected = "read before being declared")]
    fn test_forward_scalar_reference() {
        let mut builder = builder();
        let mut proc = builder.begin_proc("T");
        proc.declare_output(Key::new("y"));
        proc.assign(Key::new("y").at(0), Expr::copy(Name::Message(Pair(0, 1))));
    }

    #[test]
    #[should_panic(expected = "without a declaration")]
    fn test_undeclared_write() {
        let mut builder = builder();
        let mut proc = builder.begin_proc("T");
        proc.declare_input(Key::new("x"));
        proc.assign(Key::new("y"), Expr::copy(Key::new("x")));
    }

    #[test]
    #[should_panic(expected = "declared as Random")]
    fn test_random_is_read_only() {
        let mut builder = builder();
        let mut proc = builder.begin_proc("T");
        proc.declare_input(Key::new("x"))
            .declare_random(Name::Random(Pair(0, 1)));
        proc.assign(Name::Random(Pair(0, 1)), Expr::copy(Key::new("x").at(0)));
    }

    #[test]
    #[should_panic(expected = "exceeds the masking order")]
    fn test_share_index_bound() {
        let mut builder = builder();
        let mut proc = builder.begin_proc("T");
        proc.declare_input(Key::new("x")).declare_output(Key::new("y"));
        proc.assign(Key::new("y").at(0), Expr::copy(Key::new("x").at(2)));
    }

    #[test]
    #[should_panic(expected = "arity mismatch")]
    fn test_call_arity() {
        let mut builder = builder();
        identity(&mut builder);
        let mut proc = builder.begin_proc("T");
        proc.declare_inputs(vec![Key::new("a"), Key::new("b")])
            .declare_output(Key::new("c"));
        proc.call(vec![Key::new("c")], "ID", vec![Key::new("a"), Key::new("b")]);
    }

    #[test]
    #[should_panic(expected = "undefined gadget")]
    fn test_call_undefined() {
        let mut builder = builder();
        let mut proc = builder.begin_proc("T");
        proc.declare_input(Key::new("a")).declare_output(Key::new("c"));
        proc.call(vec![Key::new("c")], "ID", vec![Key::new("a")]);
    }

    #[test]
    #[should_panic(expected = "defined twice")]
    fn test_duplicate_proc() {
        let mut builder = builder();
        identity(&mut builder);
        identity(&mut builder);
    }

    #[test]
    #[should_panic(expected = "claim on undefined")]
    fn test_claim_undefined() {
        builder().claim(Property::Sni, "AND");
    }
}
