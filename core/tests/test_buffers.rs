#[cfg(test)]
mod buffer_tests {
    use qat_core::buffer::{ByteBuf, DispatchShape};
    use qat_core::cleaner::Cleaner;
    use qat_core::config::{Algorithm, CodecConfig};
    use qat_core::native::Device;
    use qat_core::types::ZipperError;
    use qat_core::zipper::QatZipper;

    fn payload() -> Vec<u8> {
        (0..4000u32).map(|i| (i % 251) as u8 ^ (i / 97) as u8).collect()
    }

    /// (source, destination) pair producing each dispatch shape.
    fn pair(shape: DispatchShape, src: &[u8], dst_cap: usize) -> (ByteBuf, ByteBuf) {
        let heap = || ByteBuf::wrap(src.to_vec());
        let direct = || ByteBuf::wrap_direct(src);
        match shape {
            DispatchShape::HeapHeap => (heap(), ByteBuf::allocate(dst_cap)),
            DispatchShape::DirectDirect => (direct(), ByteBuf::allocate_direct(dst_cap)),
            DispatchShape::HeapSrcDirectDst => (heap(), ByteBuf::allocate_direct(dst_cap)),
            DispatchShape::DirectSrcHeapDst => (direct(), ByteBuf::allocate(dst_cap)),
            DispatchShape::MixedCopy => (heap().as_read_only(), ByteBuf::allocate(dst_cap)),
        }
    }

    fn drain(mut buf: ByteBuf) -> Vec<u8> {
        buf.flip();
        buf.remaining_slice().to_vec()
    }

    #[test]
    fn all_shapes_produce_identical_output_and_round_trip() {
        let _ = env_logger::builder().is_test(true).try_init();
        let dev = Device::with_instances(2);
        let input = payload();

        for algorithm in [Algorithm::Deflate, Algorithm::Lz4, Algorithm::Zstd] {
            let mut z = QatZipper::open(
                CodecConfig::default().with_algorithm(algorithm),
                &dev,
                &Cleaner::new(),
            )
            .unwrap();
            let bound = z.max_compressed_length(input.len()).unwrap();

            let mut reference: Option<Vec<u8>> = None;
            for shape in DispatchShape::ALL {
                let (mut src, mut dst) = pair(shape, &input, bound);
                let n = z.compress_buffer(&mut src, &mut dst).unwrap();
                assert_eq!(src.position(), input.len(), "{algorithm} {shape:?}");
                assert_eq!(dst.position(), n);
                let packed = drain(dst);
                match &reference {
                    Some(r) => assert_eq!(&packed, r, "{algorithm} {shape:?}"),
                    None => reference = Some(packed.clone()),
                }

                let (mut csrc, mut out) = pair(shape, &packed, input.len() + 64);
                let m = z.decompress_buffer(&mut csrc, &mut out).unwrap();
                assert_eq!(m, input.len());
                assert_eq!(drain(out), input, "{algorithm} {shape:?}");
            }

            for shape in DispatchShape::ALL {
                assert_eq!(z.counters().shape_count(shape), 2, "{algorithm} {shape:?}");
            }
        }
    }

    #[test]
    fn positions_are_relative_to_the_active_range() {
        let dev = Device::with_instances(1);
        let mut z = QatZipper::open(CodecConfig::default(), &dev, &Cleaner::new()).unwrap();
        let input = payload();

        let mut src = ByteBuf::allocate_direct(input.len() + 100);
        src.set_position(100).unwrap();
        src.put_slice(&input).unwrap();
        src.set_position(100).unwrap();

        let mut dst = ByteBuf::allocate(8000);
        dst.set_position(16).unwrap();
        let n = z.compress_buffer(&mut src, &mut dst).unwrap();
        assert_eq!(src.position(), input.len() + 100);
        assert_eq!(dst.position(), 16 + n);
    }

    #[test]
    fn read_only_destination_is_rejected() {
        let dev = Device::with_instances(1);
        let mut z = QatZipper::open(CodecConfig::default(), &dev, &Cleaner::new()).unwrap();
        let mut src = ByteBuf::wrap(payload());
        let mut dst = ByteBuf::allocate(8000).as_read_only();
        assert_eq!(z.compress_buffer(&mut src, &mut dst), Err(ZipperError::ReadOnlyTarget));
        assert_eq!(src.position(), 0);
    }

    #[test]
    fn exhausted_buffers_are_argument_errors() {
        let dev = Device::with_instances(1);
        let mut z = QatZipper::open(CodecConfig::default(), &dev, &Cleaner::new()).unwrap();
        let mut src = ByteBuf::wrap(payload());
        src.set_position(src.limit()).unwrap();
        let mut dst = ByteBuf::allocate(8000);
        assert!(matches!(z.compress_buffer(&mut src, &mut dst), Err(ZipperError::Argument(_))));

        let mut src = ByteBuf::wrap(payload());
        let mut full = ByteBuf::allocate_direct(0);
        assert!(matches!(z.compress_buffer(&mut src, &mut full), Err(ZipperError::Argument(_))));
    }

    #[test]
    fn failed_call_leaves_positions_unchanged() {
        let dev = Device::with_instances(1);
        let mut z = QatZipper::open(
            CodecConfig::default().with_algorithm(Algorithm::Lz4),
            &dev,
            &Cleaner::new(),
        )
        .unwrap();
        let mut src = ByteBuf::wrap(vec![0xFF; 64]);
        let mut dst = ByteBuf::allocate_direct(16);
        assert!(z.decompress_buffer(&mut src, &mut dst).is_err());
        assert_eq!((src.position(), dst.position()), (0, 0));
    }
}
