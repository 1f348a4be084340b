//! Base gadget library shared by both protocol variants.

use log::debug;

use crate::consts::*;
use crate::document::{Builder, Expr};
use crate::share::{Key, Name, RandomPool};

/// Adds REFM, AND, PARITY_N and PARITY_Nm1 to the document.
pub fn base_library(builder: &mut Builder) {
    refm(builder);
    and(builder);
    parity_n(builder);
    parity_nm1(builder);
}

/// Multiplication-based refresh: every pair `(i, j)` of shares is blinded
/// with its own random, added to both shares.
pub fn refm(builder: &mut Builder) {
    let d = builder.params().masking;
    let pool = RandomPool::allocate(d);
    let x = Key::new("x");
    let y = Key::new("y");

    let mut proc = builder.begin_proc(REFM);
    proc.describe("Multiplication-based refresh")
        .declare_input(x)
        .declare_output(y)
        .declare_randoms(pool.names());

    for i in 0..=d {
        proc.assign(y.at(i), Expr::copy(x.at(i)));
    }
    for pair in pool.pairs() {
        let r = Name::Random(*pair);
        proc.assign(y.at(pair.0), Expr::add(y.at(pair.0), r));
        proc.assign(y.at(pair.1), Expr::add(y.at(pair.1), r));
    }
    proc.end_proc();
    debug!("{}: {} randoms", REFM, pool.len());
}

/// ISW multiplication over GF(2).
///
/// Share `i` receives the random of each pair it leads, share `j` the
/// blinded sum `a[i]*b[j] + r + a[j]*b[i]`, so the sum of `c` is `a * b`.
pub fn and(builder: &mut Builder) {
    let d = builder.params().masking;
    let pool = RandomPool::allocate(d);
    let a = Key::new("a");
    let b = Key::new("b");
    let c = Key::new("c");

    let mut proc = builder.begin_proc(AND);
    proc.describe("SNI secure AND")
        .declare_inputs(vec![a, b])
        .declare_output(c)
        .declare_randoms(pool.names());

    for i in 0..=d {
        proc.assign(c.at(i), Expr::mul(a.at(i), b.at(i)));
    }
    for pair in pool.pairs() {
        let (i, j) = (pair.0, pair.1);
        let r = Name::Random(*pair);
        let m = Name::Message(*pair);
        proc.assign(c.at(i), Expr::add(c.at(i), r));
        proc.assign(Name::Product(i, j), Expr::mul(a.at(i), b.at(j)));
        proc.assign(Name::Product(j, i), Expr::mul(a.at(j), b.at(i)));
        proc.assign(m, Expr::add(Name::Product(i, j), r));
        proc.assign(m, Expr::add(m, Name::Product(j, i)));
        proc.assign(c.at(j), Expr::add(c.at(j), m));
    }
    proc.end_proc();
    debug!("{}: {} randoms", AND, pool.len());
}

// out := in_1 + in_2 + ... + in_count, one addition per statement
fn parity(builder: &mut Builder, name: &'static str, description: &'static str, count: usize) {
    let out = Key::new("out");
    let inputs: Vec<Key> = (1..=count).map(|j| Key::new("in").party(j)).collect();

    let mut proc = builder.begin_proc(name);
    proc.describe(description)
        .declare_inputs(inputs.iter().cloned())
        .declare_output(out);
    proc.assign(out, Expr::add(inputs[0], inputs[1]));
    for input in inputs[2..].iter() {
        proc.assign(out, Expr::add(out, *input));
    }
    proc.end_proc();
}

/// Sum of the N party contributions.
pub fn parity_n(builder: &mut Builder) {
    let n = builder.params().parties;
    parity(builder, PARITY_N, "Compute parity of N shares", n);
}

/// Sum of the contributions of the first N-1 parties.
pub fn parity_nm1(builder: &mut Builder) {
    let n = builder.params().parties;
    parity(builder, PARITY_NM1, "Compute parity of N-1 shares", n - 1);
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use crate::document::Document;
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
    fn test_random_pools() {
        for d in 0..7 {
            let doc = library(3, d);
            for name in [REFM, AND] {
                let proc = doc.proc(name).unwrap();
                let distinct: HashSet<_> = proc.randoms.iter().collect();
                assert_eq!(proc.randoms.len(), d * (d + 1) / 2);
                assert_eq!(distinct.len(), proc.randoms.len());
            }
        }
    }

    #[test]
    fn test_statement_counts() {
        for d in 0..5 {
            let doc = library(3, d);
            let pairs = d * (d + 1) / 2;
            assert_eq!(doc.proc(REFM).unwrap().statements(), (d + 1) + 2 * pairs);
            assert_eq!(doc.proc(AND).unwrap().statements(), (d + 1) + 6 * pairs);
        }
    }

    #[test]
    fn test_parity() {
        for parties in 3..9 {
            let doc = library(parties, 1);

            let n = doc.proc(PARITY_N).unwrap();
            assert_eq!(n.inputs.len(), parties);
            assert_eq!(n.outputs.len(), 1);
            assert_eq!(n.statements(), parties - 1);
            assert!(n.randoms.is_empty());
            assert!(n.shares.is_empty());

            let nm1 = doc.proc(PARITY_NM1).unwrap();
            assert_eq!(nm1.inputs.len(), parties - 1);
            assert_eq!(nm1.statements(), parties - 2);
            assert!(nm1.randoms.is_empty());
        }
    }

    #[test]
    fn test_refm_text() {
        let text = library(3, 1).render();
        let expected = "\
(* Multiplication-based refresh *)
proc REFM:
  inputs: x[0:1]
  outputs: y[0:1]
  randoms: r01;
  y[0] := x[0];
  y[1] := x[1];
  y[0] := y[0] + r01;
  y[1] := y[1] + r01;
end
";
        assert!(text.starts_with(expected), "{}", text);
    }

    #[test]
    fn test_and_text() {
        let text = library(3, 1).render();
        let expected = "\
proc AND:
  inputs: a[0:1], b[0:1]
  outputs: c[0:1]
  randoms: r01;
  c[0] := a[0] * b[0];
  c[1] := a[1] * b[1];
  c[0] := c[0] + r01;
  a0_b1 := a[0] * b[1];
  a1_b0 := a[1] * b[0];
  m01 := a0_b1 + r01;
  m01 := m01 + a1_b0;
  c[1] := c[1] + m01;
end
";
        assert!(text.contains(expected), "{}", text);
    }

    #[test]
    fn test_degenerate_masking() {
        let text = library(3, 0).render();
        assert!(!text.contains("randoms"));
        assert!(text.contains("  inputs: x[0:0]\n  outputs: y[0:0]\n  y[0] := x[0];\nend\n"));
        assert!(text.contains("  c[0] := a[0] * b[0];\nend\n"));
    }
}
