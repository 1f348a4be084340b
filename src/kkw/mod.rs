//! Offline/online split of a single AND gate in the KKW protocol.

use log::debug;

use crate::consts::*;
use crate::document::{Builder, Expr};
use crate::params::{Params, Variant};
use crate::share::Key;
use crate::Composer;

pub struct KkwComposer {
    parties: usize,
}

impl KkwComposer {
    pub fn new(params: &Params) -> Self {
        debug_assert_eq!(params.variant, Variant::Kkw);
        KkwComposer {
            parties: params.parties,
        }
    }

    fn parties(&self) -> std::ops::RangeInclusive<usize> {
        1..=self.parties
    }

    /// Product of the N-party masks; party N receives the difference to
    /// the product shares of the first N-1 parties.
    fn and_offline(&self, builder: &mut Builder) {
        let n = self.parties;
        let [lx, ly, lxy] = [Key::new("lx"), Key::new("ly"), Key::new("lxy")];
        let rest = lxy.tag("nm1");

        let mut proc = builder.begin_proc(KKW_AND_OFFLINE);
        proc.declare_inputs(self.parties().map(|j| lx.party(j)))
            .declare_inputs(self.parties().map(|j| ly.party(j)))
            .declare_inputs((1..n).map(|j| lxy.party(j)))
            .declare_output(lxy.party(n))
            .declare_shares(vec![lx, ly, rest, lxy]);

        proc.call(vec![lx], PARITY_N, self.parties().map(|j| lx.party(j)).collect());
        proc.call(vec![ly], PARITY_N, self.parties().map(|j| ly.party(j)).collect());
        proc.call(vec![lxy], AND, vec![lx, ly]);
        proc.call(vec![rest], PARITY_NM1, (1..n).map(|j| lxy.party(j)).collect());
        proc.assign(lxy.party(n), Expr::add(lxy, rest));
        proc.end_proc();
    }

    /// Broadcasts `s_j = lz_j + lxy_j + hx*ly_j + hy*lx_j` of every party
    /// and the masked output `hz = hx*hy + sum(s_j)`.
    fn and_online(&self, builder: &mut Builder) {
        let [hx, hy, hz] = [Key::new("hx"), Key::new("hy"), Key::new("hz")];
        let [lx, ly, lz, lxy] = [Key::new("lx"), Key::new("ly"), Key::new("lz"), Key::new("lxy")];
        let [a, b, c, s] = [Key::new("a"), Key::new("b"), Key::new("c"), Key::new("s")];

        let mut proc = builder.begin_proc(KKW_AND_ONLINE);
        proc.declare_inputs(vec![hx, hy]);
        for mask in [lx, ly, lz, lxy] {
            proc.declare_inputs(self.parties().map(|j| mask.party(j)));
        }
        proc.declare_output(hz)
            .declare_outputs(self.parties().map(|j| s.party(j)))
            .declare_shares(self.parties().map(|j| a.party(j)))
            .declare_shares(self.parties().map(|j| b.party(j)))
            .declare_shares(vec![c, s]);

        for j in self.parties() {
            let msg = s.party(j);
            proc.note(format!("compute broadcast messages of party {}", j));
            proc.call(vec![a.party(j)], AND, vec![hx, ly.party(j)]);
            proc.call(vec![b.party(j)], AND, vec![hy, lx.party(j)]);
            proc.assign(msg, Expr::add(lz.party(j), lxy.party(j)));
            proc.assign(msg, Expr::add(msg, a.party(j)));
            proc.assign(msg, Expr::add(msg, b.party(j)));
        }

        proc.call(vec![c], AND, vec![hx, hy]);
        proc.call(vec![s], PARITY_N, self.parties().map(|j| s.party(j)).collect());
        proc.assign(hz, Expr::add(c, s));
        proc.end_proc();
    }
}

impl Composer for KkwComposer {
    fn variant(&self) -> Variant {
        Variant::Kkw
    }

    fn compose(&self, builder: &mut Builder) {
        debug!("composing KKW: N = {}", self.parties);
        self.and_offline(builder);
        self.and_online(builder);
    }
}
