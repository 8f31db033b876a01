//! Layout properties over generated field lists.

use proptest::prelude::*;

use rdf_core::{Descriptor, FieldType, FieldsBuilder, RecordBuffer, Value};

use super::helpers::{field_of, STRING_PAYLOAD};

fn arb_types() -> impl Strategy<Value = Vec<FieldType>> {
    prop::collection::vec(prop::sample::select(FieldType::ALL.to_vec()), 1..12)
}

fn build(types: &[FieldType], pack: bool) -> Descriptor {
    let fields: FieldsBuilder = types
        .iter()
        .enumerate()
        .map(|(i, &ty)| field_of(i, ty))
        .collect();
    Descriptor::new("generated", fields, pack).unwrap()
}

proptest! {
    #[test]
    fn prop_offsets_are_tight_and_aligned(types in arb_types(), pack in any::<bool>()) {
        let d = build(&types, pack);
        let mut cursor = 0usize;
        for f in d.physical_fields() {
            let expected = cursor.div_ceil(f.align()) * f.align();
            prop_assert_eq!(f.offset(), expected);
            cursor = f.end_offset();
        }
        prop_assert!(cursor <= d.mem_size());
        prop_assert!(d.mem_size() - cursor < d.mem_align());
    }

    #[test]
    fn prop_size_alignment_closure(types in arb_types(), pack in any::<bool>()) {
        let d = build(&types, pack);
        let widest = d.fields().iter().map(|f| f.align()).max().unwrap();
        prop_assert_eq!(d.mem_align(), widest);
        prop_assert_eq!(d.mem_size() % d.mem_align(), 0);
        for f in d.fields() {
            prop_assert_eq!(f.offset() % f.align(), 0);
            prop_assert!(f.end_offset() <= d.mem_size());
        }
    }

    #[test]
    fn prop_fields_do_not_overlap(types in arb_types(), pack in any::<bool>()) {
        let d = build(&types, pack);
        let spans: Vec<(usize, usize)> = d.physical_fields().map(|f| (f.offset(), f.end_offset())).collect();
        for pair in spans.windows(2) {
            prop_assert!(pair[0].1 <= pair[1].0);
        }
    }

    #[test]
    fn prop_logical_order_preserved(types in arb_types()) {
        let packed = build(&types, true);
        let unpacked = build(&types, false);
        for (i, ty) in types.iter().enumerate() {
            let p = packed.field(i).unwrap();
            let u = unpacked.field(i).unwrap();
            prop_assert_eq!(p.name(), u.name());
            prop_assert_eq!(p.field_type(), *ty);
            prop_assert_eq!(u.field_type(), *ty);
            prop_assert_eq!(p.payload(), u.payload());
            prop_assert_eq!(p.index(), i);
        }
    }

    #[test]
    fn prop_packing_never_regresses(types in arb_types()) {
        prop_assert!(build(&types, true).mem_size() <= build(&types, false).mem_size());
    }

    #[test]
    fn prop_duplicate_names_rejected(types in arb_types(), dup in any::<prop::sample::Index>()) {
        let mut fields: Vec<_> = types.iter().enumerate().map(|(i, &ty)| field_of(i, ty)).collect();
        let copy = fields[dup.index(fields.len())].clone();
        fields.push(copy);
        prop_assert!(Descriptor::new("dup", fields, true).is_err());
    }

    #[test]
    fn prop_strings_roundtrip_up_to_capacity(text in "[a-zA-Z0-9 ]{0,11}") {
        let d = build(&[FieldType::Int8, FieldType::String16, FieldType::Key8], true);
        let mut buf = RecordBuffer::new(&d, 2).unwrap();
        {
            let mut rec = buf.record_mut(1).unwrap();
            rec.set("f1", text.as_str()).unwrap();
            rec.set("f2", text.as_str()).unwrap();
        }
        let rec = buf.record(1).unwrap();
        prop_assert_eq!(rec.get::<&str>("f1").unwrap(), text.as_str());
        prop_assert_eq!(rec.value("f2").unwrap(), Value::Key(text.as_str()));
        prop_assert!(text.len() <= STRING_PAYLOAD);
    }

    #[test]
    fn prop_integers_roundtrip(a in any::<i64>(), b in any::<u16>(), c in any::<i8>()) {
        let d = build(&[FieldType::Int8, FieldType::Uint16, FieldType::Int64], true);
        let mut buf = RecordBuffer::new(&d, 1).unwrap();
        {
            let mut rec = buf.record_mut(0).unwrap();
            rec.set("f0", c).unwrap();
            rec.set("f1", b).unwrap();
            rec.set("f2", a).unwrap();
        }
        let rec = buf.record(0).unwrap();
        prop_assert_eq!(rec.get::<i8>("f0").unwrap(), c);
        prop_assert_eq!(rec.get::<u16>("f1").unwrap(), b);
        prop_assert_eq!(rec.get::<i64>("f2").unwrap(), a);
    }
}
