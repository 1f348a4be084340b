use log::debug;

use super::{PicnicComposer, GATES};
use crate::consts::*;
use crate::document::{Builder, Expr};
use crate::share::Key;

impl PicnicComposer {
    /// Online evaluation of one AND gate on the public (masked) values
    /// `hx, hy`: every party broadcasts `s_j = hx*ly_j + hy*lx_j + helper_j`
    /// and `hz = hx*hy + sum(s_j)`.
    pub(super) fn and_online(&self, builder: &mut Builder) {
        let [hx, hy, hz] = [Key::new("hx"), Key::new("hy"), Key::new("hz")];
        let c = Key::new("c");
        let s = Key::new("s");
        let lx = |j: usize| Key::new("lx").party(j);
        let ly = |j: usize| Key::new("ly").party(j);
        let a = |j: usize| Key::new("a").party(j);
        let b = |j: usize| Key::new("b").party(j);
        let helper = |j: usize| Key::new("helper").party(j);
        let msg = |j: usize| s.party(j);

        let mut proc = builder.begin_proc(PICNIC_AND_ONLINE);
        proc.declare_inputs(vec![hx, hy])
            .declare_inputs(self.parties().map(lx))
            .declare_inputs(self.parties().map(ly))
            .declare_inputs(self.parties().map(helper))
            .declare_output(hz)
            .declare_outputs(self.parties().map(msg))
            .declare_shares(self.parties().map(a))
            .declare_shares(self.parties().map(b))
            .declare_shares(vec![c, s]);

        for j in self.parties() {
            proc.call(vec![a(j)], AND, vec![hx, ly(j)]);
            proc.call(vec![b(j)], AND, vec![hy, lx(j)]);
            proc.assign(msg(j), Expr::add(a(j), b(j)));
            proc.assign(msg(j), Expr::add(msg(j), helper(j)));
        }

        proc.call(vec![c], AND, vec![hx, hy]);
        proc.assign(s, Expr::add(msg(1), msg(2)));
        for j in 3..=self.parties {
            proc.assign(s, Expr::add(s, msg(j)));
        }
        proc.assign(hz, Expr::add(c, s));
        proc.end_proc();
    }

    /// Online S-box on the public values `c, b, a` (state order), producing
    /// the public outputs `f, e, d` and the broadcasts of the three gates.
    pub(super) fn sbox_online(&self, builder: &mut Builder) {
        let [hc, hb, ha] = [Key::new("hc"), Key::new("hb"), Key::new("ha")];
        let [hf, he, hd] = [Key::new("hf"), Key::new("he"), Key::new("hd")];
        let [lc, lb, la] = [Key::new("lc"), Key::new("lb"), Key::new("la")];
        let hat = |gate: &'static str| Key::new("h").tag(gate);
        let helper = |j: usize, gate: &'static str| Key::new("helper").party(j).tag(gate);
        let msg = |j: usize, gate: &'static str| Key::new("s").party(j).tag(gate);

        let mut proc = builder.begin_proc(SBOX_ONLINE);
        proc.declare_inputs(vec![hc, hb, ha]);
        for j in self.parties() {
            proc.declare_inputs(vec![lc.party(j), lb.party(j), la.party(j)]);
        }
        for j in self.parties() {
            proc.declare_inputs(GATES.into_iter().map(|gate| helper(j, gate)));
        }
        proc.declare_outputs(vec![hf, he, hd]);
        for gate in GATES {
            proc.declare_outputs(self.parties().map(|j| msg(j, gate)));
        }
        proc.declare_shares(GATES.into_iter().map(hat));

        for (gate, hx, hy, lx, ly) in [
            ("ab", ha, hb, la, lb),
            ("bc", hb, hc, lb, lc),
            ("ca", hc, ha, lc, la),
        ] {
            let mut outputs = vec![hat(gate)];
            outputs.extend(self.parties().map(|j| msg(j, gate)));
            let mut inputs = vec![hx, hy];
            inputs.extend(self.parties().map(|j| lx.party(j)));
            inputs.extend(self.parties().map(|j| ly.party(j)));
            inputs.extend(self.parties().map(|j| helper(j, gate)));
            proc.call(outputs, PICNIC_AND_ONLINE, inputs);
        }

        // f = a + b + c + ab
        proc.assign(hf, Expr::add(ha, hb));
        proc.assign(hf, Expr::add(hf, hc));
        proc.assign(hf, Expr::add(hf, hat("ab")));
        // e = a + b + ca
        proc.assign(he, Expr::add(ha, hb));
        proc.assign(he, Expr::add(he, hat("ca")));
        // d = a + bc
        proc.assign(hd, Expr::add(ha, hat("bc")));
        proc.end_proc();
    }

    /// Online part of one LowMC round: S-box layer, linear layer and key
    /// addition. The new state is refreshed before it leaves the gadget.
    pub(super) fn round_online(&self, builder: &mut Builder) {
        let hsk = Key::new("hsk");
        let stin = Key::new("stin");
        let stout = Key::new("stout");
        let tape = Key::new("tape");
        let helper = Key::new("helper");
        let msgs = Key::new("msgs");
        let sbout = Key::new("sbout");
        let mmout = Key::new("mmout");
        let rk = Key::new("rk");
        let stouttmp = Key::new("stouttmp");

        let mut proc = builder.begin_proc(LOWMC_ROUND_ONLINE);
        proc.declare_inputs(self.block(hsk))
            .declare_inputs(self.block(stin))
            .declare_inputs(self.per_party(tape, self.parties()))
            .declare_inputs(self.per_party(helper, self.parties()))
            .declare_outputs(self.block(stout))
            .declare_outputs(self.per_party(msgs, self.parties()))
            .declare_shares(self.block(sbout))
            .declare_shares(self.block(mmout))
            .declare_shares(self.block(rk))
            .declare_shares(self.block(stouttmp));

        proc.note("sbox layer");
        for s in 0..self.nbits / SBOX_WIDTH {
            let p = Self::sbox_positions(s);
            let mut outputs: Vec<Key> = p.iter().map(|i| sbout.position(*i)).collect();
            for i in p.iter() {
                outputs.extend(self.parties().map(|j| msgs.party(j).position(*i)));
            }
            let mut inputs: Vec<Key> = p.iter().map(|i| stin.position(*i)).collect();
            for j in self.parties() {
                inputs.extend(p.iter().map(|i| tape.party(j).position(*i)));
            }
            for j in self.parties() {
                inputs.extend(p.iter().map(|i| helper.party(j).position(*i)));
            }
            proc.call(outputs, SBOX_ONLINE, inputs);
        }

        proc.note("affine layer");
        proc.call(self.block(mmout), AFFINE, self.block(sbout));

        proc.note("key update");
        proc.call(self.block(rk), AFFINE, self.block(hsk));

        proc.note("state update, refreshed to keep the round NI");
        for i in self.positions() {
            proc.assign(stouttmp.position(i), Expr::add(mmout.position(i), rk.position(i)));
            proc.call(vec![stout.position(i)], REFM, vec![stouttmp.position(i)]);
        }
        proc.end_proc();
    }

    /// Online phase: rounds 1 to r chained on the refreshed initial state.
    pub(super) fn online(&self, builder: &mut Builder) {
        let hsk = Key::new("hsk");
        let tape = Key::new("tape");
        let helper = Key::new("helper");
        let msgs = Key::new("msgs");
        let stin = Key::new("stin");
        let rk = Key::new("rk").round(0);

        let mut proc = builder.begin_proc(PICNIC_ONLINE);
        proc.declare_inputs(self.block(hsk))
            .declare_inputs(self.per_round(tape, self.parties()))
            .declare_inputs(self.per_round(helper, self.parties()))
            .declare_outputs(self.per_round(msgs, self.parties()))
            .declare_outputs(self.block(stin.round(self.rounds + 1)))
            .declare_shares(self.block(rk));
        for k in self.rounds() {
            proc.declare_shares(self.block(stin.round(k)));
        }

        proc.note("key init");
        proc.call(self.block(rk), AFFINE, self.block(hsk));
        for i in self.positions() {
            proc.call(vec![stin.round(1).position(i)], REFM, vec![rk.position(i)]);
        }

        for k in self.rounds() {
            debug!("{}: round {}", PICNIC_ONLINE, k);
            proc.note(format!("round {}", k));
            let mut outputs = self.block(stin.round(k + 1));
            outputs.extend(self.per_party(msgs.round(k), self.parties()));
            let mut inputs = self.block(hsk);
            inputs.extend(self.block(stin.round(k)));
            inputs.extend(self.per_party(tape.round(k), self.parties()));
            inputs.extend(self.per_party(helper.round(k), self.parties()));
            proc.call(outputs, LOWMC_ROUND_ONLINE, inputs);
        }
        proc.end_proc();
    }
}
