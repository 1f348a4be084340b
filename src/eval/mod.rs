//! Evaluates generated gadgets in the clear over GF(2).
//!
//! Every instantiation of a procedure draws fresh values for the randoms
//! it declares, exactly as the verifier inlines calls. The [`Trace`]
//! records which procedure each instance ran and every random it drew.

use std::collections::HashMap;

use rand::{Rng, RngCore};

use crate::algebra::gf2::Bit;
use crate::algebra::RingElement;
use crate::document::{Document, Expr, Stmt};
use crate::share::{Name, Operand};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Value {
    Sharing(Vec<Bit>),
    Scalar(Bit),
}

#[derive(Clone, Debug, Default)]
pub struct Trace {
    /// gadget run by each instance, indexed by instance id
    pub instances: Vec<&'static str>,
    /// `(instance id, random)` for every random drawn
    pub randoms: Vec<(usize, Name)>,
}

impl Trace {
    pub fn instantiations(&self, gadget: &str) -> usize {
        self.instances.iter().filter(|name| **name == gadget).count()
    }
}

pub struct Evaluator<'a, R: RngCore> {
    document: &'a Document,
    rng: R,
    trace: Trace,
}

impl<'a, R: RngCore> Evaluator<'a, R> {
    pub fn new(document: &'a Document, rng: R) -> Self {
        Evaluator {
            document,
            rng,
            trace: Trace::default(),
        }
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn into_trace(self) -> Trace {
        self.trace
    }

    /// Runs `gadget` on the given input sharings, returning its output
    /// sharings in declaration order.
    pub fn call(&mut self, gadget: &str, inputs: &[Vec<Bit>]) -> Vec<Vec<Bit>> {
        let document: &'a Document = self.document;
        let width = document.masking() + 1;
        let proc = document
            .proc(gadget)
            .unwrap_or_else(|| panic!("undefined gadget {}", gadget));
        assert_eq!(proc.inputs.len(), inputs.len(), "arity of {}", gadget);

        let instance = self.trace.instances.len();
        self.trace.instances.push(proc.name);

        let mut env: HashMap<Name, Value> = HashMap::new();
        for (key, sharing) in proc.inputs.iter().zip(inputs.iter()) {
            assert_eq!(sharing.len(), width, "width of {} in {}", key, gadget);
            env.insert(Name::Sharing(*key), Value::Sharing(sharing.clone()));
        }
        for key in proc.outputs.iter().chain(proc.shares.iter()) {
            env.insert(Name::Sharing(*key), Value::Sharing(vec![Bit::ZERO; width]));
        }
        for name in proc.randoms.iter() {
            env.insert(*name, Value::Scalar(self.rng.gen()));
            self.trace.randoms.push((instance, *name));
        }

        for stmt in proc.body.iter() {
            match stmt {
                Stmt::Assign { dst, expr } => {
                    let value = match expr {
                        Expr::Copy(a) => read(&env, a),
                        Expr::Add(a, b) => combine(read(&env, a), read(&env, b), |x, y| x + y),
                        Expr::Mul(a, b) => combine(read(&env, a), read(&env, b), |x, y| x * y),
                    };
                    write(&mut env, dst, value);
                }
                Stmt::Call {
                    outputs,
                    gadget,
                    inputs,
                } => {
                    let args: Vec<Vec<Bit>> = inputs
                        .iter()
                        .map(|key| match read(&env, &Operand::from(*key)) {
                            Value::Sharing(shares) => shares,
                            Value::Scalar(_) => unreachable!("gadget arguments are sharings"),
                        })
                        .collect();
                    let results = self.call(gadget, &args);
                    for (key, result) in outputs.iter().zip(results) {
                        write(&mut env, &Operand::from(*key), Value::Sharing(result));
                    }
                }
                Stmt::Comment(_) => (),
            }
        }

        proc.outputs
            .iter()
            .map(|key| match env.remove(&Name::Sharing(*key)) {
                Some(Value::Sharing(shares)) => shares,
                _ => unreachable!("outputs are sharings"),
            })
            .collect()
    }
}

fn read(env: &HashMap<Name, Value>, operand: &Operand) -> Value {
    let value = env
        .get(&operand.name)
        .unwrap_or_else(|| panic!("{} is unbound", operand));
    match (value, operand.index) {
        (Value::Sharing(shares), Some(i)) => Value::Scalar(shares[i]),
        (value, None) => value.clone(),
        (Value::Scalar(_), Some(_)) => panic!("{} indexes a scalar", operand),
    }
}

fn write(env: &mut HashMap<Name, Value>, dst: &Operand, value: Value) {
    match (dst.index, value) {
        (Some(i), Value::Scalar(bit)) => match env.get_mut(&dst.name) {
            Some(Value::Sharing(shares)) => shares[i] = bit,
            _ => panic!("{} is not a sharing", dst),
        },
        (None, value) => {
            env.insert(dst.name, value);
        }
        (Some(_), Value::Sharing(_)) => panic!("sharing assigned to the share {}", dst),
    }
}

fn combine(a: Value, b: Value, op: fn(Bit, Bit) -> Bit) -> Value {
    match (a, b) {
        (Value::Sharing(x), Value::Sharing(y)) => {
            Value::Sharing(x.into_iter().zip(y).map(|(x, y)| op(x, y)).collect())
        }
        (Value::Scalar(x), Value::Scalar(y)) => Value::Scalar(op(x, y)),
        _ => panic!("a sharing and a scalar cannot be combined"),
    }
}

/// Splits `secret` into `masking + 1` uniformly random shares.
pub fn share<R: Rng>(rng: &mut R, secret: Bit, masking: usize) -> Vec<Bit> {
    let mut shares: Vec<Bit> = (0..masking).map(|_| rng.gen()).collect();
    let last = secret - reconstruct(&shares);
    shares.push(last);
    shares
}

/// Sum of all shares.
pub fn reconstruct<E: RingElement>(shares: &[E]) -> E {
    shares.iter().fold(E::zero(), |acc, share| acc + *share)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::thread_rng;

    use crate::consts::*;
    use crate::document::Builder;
    use crate::gadgets::base_library;
    use crate::params::Params;

    fn library(parties: usize, masking: usize) -> Document {
        let mut builder = Builder::new(Params {
            parties,
            masking,
            ..Params::default()
        });
        base_library(&mut builder);
        builder.finish()
    }

    #[test]
    fn test_share() {
        let mut rng = thread_rng();
        for d in 0..6 {
            for secret in [Bit::ZERO, Bit::ONE] {
                let shares = share(&mut rng, secret, d);
                assert_eq!(shares.len(), d + 1);
                assert_eq!(reconstruct(&shares), secret);
            }
        }
    }

    #[test]
    fn test_and() {
        let mut rng = thread_rng();
        for d in 0..6 {
            let doc = library(3, d);
            let mut eval = Evaluator::new(&doc, thread_rng());
            for _ in 0..32 {
                for a in [Bit::ZERO, Bit::ONE] {
                    for b in [Bit::ZERO, Bit::ONE] {
                        let inputs = vec![share(&mut rng, a, d), share(&mut rng, b, d)];
                        let c = eval.call(AND, &inputs);
                        assert_eq!(reconstruct(&c[0]), a * b, "d = {}, inputs = {:?}", d, inputs);
                    }
                }
            }
        }
    }

    #[test]
    fn test_refm() {
        let mut rng = thread_rng();
        for d in 0..6 {
            let doc = library(3, d);
            let mut eval = Evaluator::new(&doc, thread_rng());
            for secret in [Bit::ZERO, Bit::ONE] {
                let x = share(&mut rng, secret, d);
                let y = eval.call(REFM, &[x]);
                assert_eq!(reconstruct(&y[0]), secret);
            }
            assert_eq!(eval.trace().randoms.len(), 2 * d * (d + 1) / 2);
        }
    }

    #[test]
    fn test_parity() {
        let mut rng = thread_rng();
        for parties in 3..8 {
            let doc = library(parties, 2);
            let mut eval = Evaluator::new(&doc, thread_rng());
            let secrets: Vec<Bit> = (0..parties).map(|_| rng.gen()).collect();
            let inputs: Vec<Vec<Bit>> = secrets.iter().map(|s| share(&mut rng, *s, 2)).collect();

            let out = eval.call(PARITY_N, &inputs);
            assert_eq!(reconstruct(&out[0]), reconstruct(&secrets));

            let out = eval.call(PARITY_NM1, &inputs[..parties - 1]);
            assert_eq!(reconstruct(&out[0]), reconstruct(&secrets[..parties - 1]));

            assert!(eval.trace().randoms.is_empty());
        }
    }

    #[test]
    fn test_fresh_randoms_per_instance() {
        let doc = library(3, 3);
        let mut eval = Evaluator::new(&doc, thread_rng());
        let zero = vec![Bit::ZERO; 4];
        for _ in 0..5 {
            eval.call(AND, &[zero.clone(), zero.clone()]);
        }
        let trace = eval.into_trace();
        assert_eq!(trace.instantiations(AND), 5);
        assert_eq!(trace.randoms.len(), 5 * 6);
        for (instance, _) in trace.randoms.iter() {
            assert!(*instance < 5);
        }
    }
}
