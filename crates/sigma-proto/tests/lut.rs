#[cfg(test)]
mod tests {
    use sigma_proto::lut::{
        add_trigger_function, build_basic_trigger, build_lut_entry, Trigger, TriggerFunc,
        TriggerLut, TriggerOp, M4_BASIC_TRIGGER, PARAMS_SELRES_EVENT,
    };

    #[test]
    fn value_mask_only() {
        // Match 0b0101 on the low quad, other quads unconstrained.
        let trigger = Trigger {
            simple_value: 0x0005,
            simple_mask: 0x000f,
            ..Trigger::default()
        };
        let lut = build_basic_trigger(&trigger);

        assert_eq!(lut.m2d[0], 0x0020);
        assert_eq!(lut.m2d[1], 0xffff);
        assert_eq!(lut.m2d[2], 0xffff);
        assert_eq!(lut.m2d[3], 0xffff);
        // No edges: the edge layer always passes.
        assert_eq!(lut.m3, 0xffff);
        assert_eq!(lut.m4, M4_BASIC_TRIGGER);
        assert_eq!(lut.params, PARAMS_SELRES_EVENT);
    }

    #[test]
    fn empty_trigger() {
        let lut = build_basic_trigger(&Trigger::default());
        assert_eq!(lut.m3, 0xffff);
        assert_eq!(lut.m4, 0xa000);
        assert_eq!(lut.m2d, [0xffff; 4]);
        assert_eq!(lut.m0d, [0xffff; 4]);
        assert_eq!(lut.m1d, [0xffff; 4]);
    }

    #[test]
    fn single_rising_edge() {
        let trigger = Trigger {
            rising_mask: 0x0001,
            ..Trigger::default()
        };
        let lut = build_basic_trigger(&trigger);

        // Edge slot 0 watches channel 0: the entry passes whenever the
        // channel 0 bit of the pattern is set.
        assert_eq!(lut.m0d[0], 0xaaaa);
        assert_eq!(lut.m0d[1], 0xffff);
        // Slot 1 is unused.
        assert_eq!(lut.m1d, [0xffff; 4]);
        // Rise on slot 0: pass where (prev, curr) = (0, 1).
        assert_eq!(lut.m3, 0x2222);
    }

    #[test]
    fn two_edges_are_ored() {
        let trigger = Trigger {
            rising_mask: 0x0001,
            falling_mask: 0x0008,
            ..Trigger::default()
        };
        let lut = build_basic_trigger(&trigger);
        // Rise on slot 0 (0x2222) ORed with fall on slot 1 (0x0f00).
        assert_eq!(lut.m3, 0x2f22);
    }

    #[test]
    fn lut_entry_masks_quads_independently() {
        let mut entry = [0u16; 4];
        // Channel 4 (quad 1, bit 0) must be high.
        build_lut_entry(0x0010, 0x0010, &mut entry);
        assert_eq!(entry[0], 0xffff);
        assert_eq!(entry[1], 0xaaaa);
        assert_eq!(entry[2], 0xffff);
        assert_eq!(entry[3], 0xffff);
    }

    #[test]
    fn trigger_functions() {
        // Fall on slot 0: pass where (prev, curr) = (1, 0).
        let mut mask = 0u16;
        add_trigger_function(TriggerOp::Fall, TriggerFunc::Or, 0, false, &mut mask);
        assert_eq!(mask, 0x4444);

        // RiseFall is the union of both transitions.
        let mut mask = 0u16;
        add_trigger_function(TriggerOp::RiseFall, TriggerFunc::Or, 0, false, &mut mask);
        assert_eq!(mask, 0x6666);

        // Negation transposes the table diagonally: a negated rise is a
        // fall.
        let mut mask = 0u16;
        add_trigger_function(TriggerOp::Rise, TriggerFunc::Or, 0, true, &mut mask);
        assert_eq!(mask, 0x4444);

        // And against an all-ones mask keeps only the operator bits.
        let mut mask = 0xffffu16;
        add_trigger_function(TriggerOp::Rise, TriggerFunc::And, 0, false, &mut mask);
        assert_eq!(mask, 0x2222);
    }

    #[test]
    fn select_entry_transposes_the_tables() {
        let lut = TriggerLut {
            m2d: [0x0001, 0, 0, 0],
            m3: 0x0001,
            m4: 0x0001,
            m0d: [0x0001, 0, 0, 0],
            m1d: [0, 0, 0, 0x0001],
            ..TriggerLut::default()
        };

        // Step 0 collects bit 0 of every table.
        assert_eq!(lut.select_entry(0), [0x51, 0x81]);
        // No table has bit 1 set.
        assert_eq!(lut.select_entry(1), [0x00, 0x00]);
    }

    #[test]
    fn params_encode_little_endian() {
        let lut = build_basic_trigger(&Trigger::default());
        assert_eq!(lut.params_bytes(), [0x00, 0x0c]);
    }
}
