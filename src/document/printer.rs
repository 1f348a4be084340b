use std::fmt::{self, Display, Formatter, Write};

use super::{Claim, Document, Expr, Proc, Stmt};
use crate::consts::CLAIM_DIRECTIVE;
use crate::share::Key;

// writes "item, item, item"
fn write_list<T: Display>(f: &mut Formatter<'_>, items: &[T]) -> fmt::Result {
    for (n, item) in items.iter().enumerate() {
        if n > 0 {
            f.write_str(", ")?;
        }
        item.fmt(f)?;
    }
    Ok(())
}

// writes "x[0:d], y[0:d]"
fn write_sharings(f: &mut Formatter<'_>, keys: &[Key], masking: usize) -> fmt::Result {
    for (n, key) in keys.iter().enumerate() {
        if n > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}[0:{}]", key, masking)?;
    }
    Ok(())
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Copy(a) => write!(f, "{}", a),
            Expr::Add(a, b) => write!(f, "{} + {}", a, b),
            Expr::Mul(a, b) => write!(f, "{} * {}", a, b),
        }
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Assign { dst, expr } => write!(f, "{} := {};", dst, expr),
            Stmt::Call {
                outputs,
                gadget,
                inputs,
            } => {
                if outputs.len() == 1 {
                    write!(f, "{}", outputs[0])?;
                } else {
                    f.write_char('(')?;
                    write_list(f, outputs)?;
                    f.write_char(')')?;
                }
                write!(f, " = {}(", gadget)?;
                write_list(f, inputs)?;
                f.write_str(");")
            }
            Stmt::Comment(text) => write!(f, "(* {} *)", text),
        }
    }
}

impl Display for Claim {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", CLAIM_DIRECTIVE, self.property, self.target)
    }
}

struct ProcPrinter<'a> {
    proc: &'a Proc,
    masking: usize,
}

impl Display for ProcPrinter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let proc = self.proc;
        if let Some(description) = proc.description {
            writeln!(f, "(* {} *)", description)?;
        }
        writeln!(f, "proc {}:", proc.name)?;

        f.write_str("  inputs: ")?;
        write_sharings(f, &proc.inputs, self.masking)?;
        f.write_str("\n  outputs: ")?;
        write_sharings(f, &proc.outputs, self.masking)?;
        f.write_char('\n')?;

        // empty pools (masking order 0) and gadgets without locals omit the line
        if !proc.randoms.is_empty() {
            f.write_str("  randoms: ")?;
            write_list(f, &proc.randoms)?;
            f.write_str(";\n")?;
        }
        if !proc.shares.is_empty() {
            f.write_str("  shares: ")?;
            write_sharings(f, &proc.shares, self.masking)?;
            f.write_str(";\n")?;
        }

        for stmt in proc.body.iter() {
            writeln!(f, "  {}", stmt)?;
        }
        f.write_str("end\n")
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for proc in self.procs.iter() {
            let printer = ProcPrinter {
                proc,
                masking: self.masking(),
            };
            writeln!(f, "{}", printer)?;
        }
        for claim in self.claims.iter() {
            writeln!(f, "{}", claim)?;
        }
        Ok(())
    }
}
