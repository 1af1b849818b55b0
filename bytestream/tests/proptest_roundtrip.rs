use bytestream::{ByteReader, ByteWriter};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    U8(u8),
    U16Le(u16),
    U16Be(u16),
    U32Le(u32),
    U32Be(u32),
    U64Le(u64),
    F64Le(f64),
    Prefixed(Vec<u8>),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u8>().prop_map(Op::U8),
        any::<u16>().prop_map(Op::U16Le),
        any::<u16>().prop_map(Op::U16Be),
        any::<u32>().prop_map(Op::U32Le),
        any::<u32>().prop_map(Op::U32Be),
        any::<u64>().prop_map(Op::U64Le),
        any::<f64>().prop_map(Op::F64Le),
        prop::collection::vec(any::<u8>(), 0..40).prop_map(Op::Prefixed),
    ]
}

proptest! {
    #[test]
    fn prop_roundtrip_ops(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let mut writer = ByteWriter::new();
        for op in &ops {
            match op {
                Op::U8(v) => writer.write_u8(*v).unwrap(),
                Op::U16Le(v) => writer.write_u16_le(*v).unwrap(),
                Op::U16Be(v) => writer.write_u16_be(*v).unwrap(),
                Op::U32Le(v) => writer.write_u32_le(*v).unwrap(),
                Op::U32Be(v) => writer.write_u32_be(*v).unwrap(),
                Op::U64Le(v) => writer.write_u64_le(*v).unwrap(),
                Op::F64Le(v) => writer.write_f64_le(*v).unwrap(),
                Op::Prefixed(data) => {
                    writer.write_length_prefix(data.len(), 1).unwrap();
                    writer.write_bytes(data).unwrap();
                }
            }
        }
        let bytes = writer.finish();

        let mut reader = ByteReader::new(&bytes);
        for op in &ops {
            match op {
                Op::U8(v) => {
                    prop_assert_eq!(reader.read_u8().unwrap(), *v);
                }
                Op::U16Le(v) => {
                    prop_assert_eq!(reader.read_u16_le().unwrap(), *v);
                }
                Op::U16Be(v) => {
                    prop_assert_eq!(reader.read_u16_be().unwrap(), *v);
                }
                Op::U32Le(v) => {
                    prop_assert_eq!(reader.read_u32_le().unwrap(), *v);
                }
                Op::U32Be(v) => {
                    prop_assert_eq!(reader.read_u32_be().unwrap(), *v);
                }
                Op::U64Le(v) => {
                    prop_assert_eq!(reader.read_u64_le().unwrap(), *v);
                }
                Op::F64Le(v) => {
                    prop_assert_eq!(reader.read_f64_le().unwrap().to_bits(), v.to_bits());
                }
                Op::Prefixed(data) => {
                    let len = reader.read_length_prefix(1).unwrap();
                    prop_assert_eq!(reader.read_bytes(len).unwrap(), data.as_slice());
                }
            }
        }
        prop_assert!(reader.is_empty());
    }

    #[test]
    fn prop_reader_never_panics(data in prop::collection::vec(any::<u8>(), 0..32), n in 0usize..64) {
        let mut reader = ByteReader::new(&data);
        let result = reader.read_bytes(n);
        prop_assert_eq!(result.is_ok(), n <= data.len());
    }
}
