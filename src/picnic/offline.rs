use log::debug;

use super::{PicnicComposer, GATES};
use crate::consts::*;
use crate::document::{Builder, Expr};
use crate::share::Key;

impl PicnicComposer {
    /// Helper of party N for one AND gate: the N-1 tape helpers are summed
    /// and party N takes the difference to `lx * ly + lz`.
    pub(super) fn and_offline(&self, builder: &mut Builder) {
        let n = self.parties;
        let lx = Key::new("lx");
        let ly = Key::new("ly");
        let lz = Key::new("lz");
        let lxy = Key::new("lxy");
        let rest = Key::new("helper").tag("nm1");
        let helper = |j: usize| Key::new("helper").party(j);

        let mut proc = builder.begin_proc(PICNIC_AND_OFFLINE);
        proc.declare_inputs(vec![lx, ly, lz])
            .declare_inputs(self.tape_parties().map(helper))
            .declare_output(helper(n))
            .declare_shares(vec![rest, lxy]);

        proc.call(vec![rest], PARITY_NM1, self.tape_parties().map(helper).collect());
        proc.call(vec![lxy], AND, vec![lx, ly]);
        proc.assign(helper(n), Expr::add(lxy, rest));
        proc.assign(helper(n), Expr::add(helper(n), lz));
        proc.end_proc();
    }

    /// Helpers of party N for the three AND gates of one S-box.
    ///
    /// Inputs are the input masks `c, b, a` and the output masks `f, e, d`.
    pub(super) fn sbox_offline(&self, builder: &mut Builder) {
        let n = self.parties;
        let [lc, lb, la] = [Key::new("lc"), Key::new("lb"), Key::new("la")];
        let [lf, le, ld] = [Key::new("lf"), Key::new("le"), Key::new("ld")];
        let lz = |gate: &'static str| Key::new("lz").tag(gate);
        let helper = |j: usize, gate: &'static str| Key::new("helper").party(j).tag(gate);

        let mut proc = builder.begin_proc(SBOX_OFFLINE);
        proc.declare_inputs(vec![lc, lb, la, lf, le, ld]);
        for j in self.tape_parties() {
            proc.declare_inputs(GATES.into_iter().map(|gate| helper(j, gate)));
        }
        proc.declare_outputs(GATES.into_iter().map(|gate| helper(n, gate)))
            .declare_shares(GATES.into_iter().map(lz));

        // output masks of the AND gates
        proc.assign(lz("ab"), Expr::add(lf, la));
        proc.assign(lz("ab"), Expr::add(lz("ab"), lb));
        proc.assign(lz("ab"), Expr::add(lz("ab"), lc));
        proc.assign(lz("bc"), Expr::add(ld, la));
        proc.assign(lz("ca"), Expr::add(le, la));
        proc.assign(lz("ca"), Expr::add(lz("ca"), lb));

        for (gate, x, y) in [("ab", la, lb), ("bc", lb, lc), ("ca", lc, la)] {
            let mut inputs = vec![x, y, lz(gate)];
            inputs.extend(self.tape_parties().map(|j| helper(j, gate)));
            proc.call(vec![helper(n, gate)], PICNIC_AND_OFFLINE, inputs);
        }
        proc.end_proc();
    }

    /// Offline part of one LowMC round: the masks of the round input
    /// (`prstin`, masked with the round key) go through the linear layer,
    /// the S-box layer derives the helpers of party N.
    pub(super) fn round_offline(&self, builder: &mut Builder) {
        let n = self.parties;
        let lsk = Key::new("lsk");
        let prstin = Key::new("prstin");
        let stin = Key::new("stin");
        let stout = Key::new("stout");
        let stouttmp = Key::new("stouttmp");
        let rk = Key::new("rk");
        let helper = Key::new("helper");

        let mut proc = builder.begin_proc(LOWMC_ROUND_OFFLINE);
        proc.declare_inputs(self.block(lsk))
            .declare_inputs(self.block(prstin))
            .declare_inputs(self.block(stin))
            .declare_inputs(self.per_party(helper, self.tape_parties()))
            .declare_outputs(self.per_party(helper, std::iter::once(n)))
            .declare_shares(self.block(stout))
            .declare_shares(self.block(stouttmp))
            .declare_shares(self.block(rk));

        // key update
        proc.call(self.block(rk), AFFINE, self.block(lsk));
        for i in self.positions() {
            proc.assign(stouttmp.position(i), Expr::add(prstin.position(i), rk.position(i)));
        }

        // linear layer
        proc.call(self.block(stout), AFFINE, self.block(stouttmp));

        // s-box layer
        for s in 0..self.nbits / SBOX_WIDTH {
            let p = Self::sbox_positions(s);
            let mut inputs: Vec<Key> = p.iter().map(|i| stin.position(*i)).collect();
            inputs.extend(p.iter().map(|i| stout.position(*i)));
            for j in self.tape_parties() {
                inputs.extend(p.iter().map(|i| helper.party(j).position(*i)));
            }
            let outputs = p.iter().map(|i| helper.party(n).position(*i)).collect();
            proc.call(outputs, SBOX_OFFLINE, inputs);
        }
        proc.end_proc();
    }

    /// Offline phase over all rounds, from round r down to round 1.
    ///
    /// Round k reads the masks of round k+1 as its previous state; the
    /// masks of round r+1 are an input of the phase.
    pub(super) fn offline(&self, builder: &mut Builder) {
        let n = self.parties;
        let tape = Key::new("tape");
        let helper = Key::new("helper");
        let stin = Key::new("stin");
        let rk = Key::new("rk").round(0);
        let lsk = Key::new("lsk");

        let mut proc = builder.begin_proc(PICNIC_OFFLINE);
        proc.declare_inputs(self.per_round(tape, self.parties()))
            .declare_inputs(self.per_round(helper, self.tape_parties()))
            .declare_inputs(self.block(stin.round(self.rounds + 1)))
            .declare_outputs(self.per_round(helper, std::iter::once(n)))
            .declare_outputs(self.block(lsk))
            .declare_shares(self.block(rk));
        for k in self.rounds() {
            proc.declare_shares(self.block(stin.round(k)));
        }

        proc.note("extract initial key");
        for i in self.positions() {
            let tapes = self.parties().map(|j| tape.round(1).party(j).position(i)).collect();
            proc.call(vec![rk.position(i)], PARITY_N, tapes);
        }
        proc.note("re-compute secret key masks: lsk = K^-1*r0_rk");
        proc.call(self.block(lsk), AFFINE, self.block(rk));

        for k in self.rounds().rev() {
            debug!("{}: round {}", PICNIC_OFFLINE, k);
            proc.note(format!("round {}", k));
            let current = stin.round(k);
            for i in self.positions() {
                if k == 1 {
                    proc.assign(current.position(i), Expr::copy(rk.position(i)));
                } else {
                    let tapes = self.parties().map(|j| tape.round(k).party(j).position(i)).collect();
                    proc.call(vec![current.position(i)], PARITY_N, tapes);
                }
            }

            let mut inputs = self.block(lsk);
            inputs.extend(self.block(stin.round(k + 1)));
            inputs.extend(self.block(current));
            inputs.extend(self.per_party(helper.round(k), self.tape_parties()));
            proc.call(
                self.per_party(helper.round(k), std::iter::once(n)),
                LOWMC_ROUND_OFFLINE,
                inputs,
            );
        }
        proc.end_proc();
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::document;
    use crate::consts::*;

    #[test]
    fn test_round_sboxes() {
        for nbits in [3, 6, 9, 12] {
            let doc = document(3, nbits, 2, 1);
            let round = doc.proc(LOWMC_ROUND_OFFLINE).unwrap();
            assert_eq!(round.calls_to(SBOX_OFFLINE), nbits / 3);
            assert_eq!(round.calls_to(AFFINE), 2);
        }
    }

    #[test]
    fn test_rounds_reversed() {
        let doc = document(3, 3, 3, 1);
        let offline = doc.proc(PICNIC_OFFLINE).unwrap();
        let rounds: Vec<String> = offline
            .calls()
            .filter(|(gadget, _, _)| *gadget == LOWMC_ROUND_OFFLINE)
            .map(|(_, outputs, _)| outputs[0].to_string())
            .collect();
        assert_eq!(rounds, vec!["r3_helper_P3_1_", "r2_helper_P3_1_", "r1_helper_P3_1_"]);

        // round k reads the state masks of round k + 1
        let text = doc.render();
        assert!(text.contains("r4_stin_1_, r4_stin_2_, r4_stin_3_, r3_stin_1_"));
        assert!(text.contains("r2_stin_1_, r2_stin_2_, r2_stin_3_, r1_stin_1_"));
        assert!(text.contains("  r1_stin_2_ := r0_rk_2_;\n"));
        assert!(text.contains("  r2_stin_2_ = PARITY_N(r2_tape_P1_2_, r2_tape_P2_2_, r2_tape_P3_2_);\n"));
    }

    #[test]
    fn test_and_offline_text() {
        let text = document(4, 3, 1, 1).render();
        let expected = "\
proc PICNIC_AND_OFFLINE:
  inputs: lx[0:1], ly[0:1], lz[0:1], helper_P1_[0:1], helper_P2_[0:1], helper_P3_[0:1]
  outputs: helper_P4_[0:1]
  shares: helper_nm1[0:1], lxy[0:1];
  helper_nm1 = PARITY_Nm1(helper_P1_, helper_P2_, helper_P3_);
  lxy = AND(lx, ly);
  helper_P4_ := lxy + helper_nm1;
  helper_P4_ := helper_P4_ + lz;
end
";
        assert!(text.contains(expected), "{}", text);
    }

    #[test]
    fn test_sbox_offline_interface() {
        let parties = 5;
        let doc = document(parties, 3, 1, 1);
        let sbox = doc.proc(SBOX_OFFLINE).unwrap();
        assert_eq!(sbox.inputs.len(), 6 + 3 * (parties - 1));
        assert_eq!(sbox.outputs.len(), 3);
        assert_eq!(sbox.calls_to(PICNIC_AND_OFFLINE), 3);
        assert!(sbox.randoms.is_empty());
    }
}
