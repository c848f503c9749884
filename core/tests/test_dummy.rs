#[cfg(test)]
mod dummy_tests {
    use qat_core::backend::BackendKind;
    use qat_core::buffer::ByteBuf;
    use qat_core::cleaner::Cleaner;
    use qat_core::config::{Algorithm, CodecConfig};
    use qat_core::native::Device;
    use qat_core::types::ZipperError;
    use qat_core::zipper::QatZipper;

    fn dummy(ratio: u32) -> QatZipper {
        let cfg = CodecConfig::default()
            .with_algorithm(Algorithm::Dummy)
            .with_inverse_ratio(ratio);
        QatZipper::open(cfg, &Device::with_instances(0), &Cleaner::new()).unwrap()
    }

    #[test]
    fn bound_is_ratio_times_length() {
        let z = dummy(2);
        assert_eq!(z.backend_kind(), BackendKind::Test);
        assert_eq!(z.max_compressed_length(10).unwrap(), 20);
        assert_eq!(dummy(5).max_compressed_length(7).unwrap(), 35);
    }

    #[test]
    fn needs_no_hardware_and_ignores_level() {
        let cfg = CodecConfig::default().with_algorithm(Algorithm::Dummy).with_level(99);
        assert!(QatZipper::open(cfg, &Device::with_instances(0), &Cleaner::new()).is_ok());
    }

    #[test]
    fn ratio_out_of_range_is_a_configuration_error() {
        for ratio in [0, 10] {
            let cfg = CodecConfig::default()
                .with_algorithm(Algorithm::Dummy)
                .with_inverse_ratio(ratio);
            let dev = Device::with_instances(0);
            let err = QatZipper::open(cfg, &dev, &Cleaner::new()).unwrap_err();
            assert!(matches!(err, ZipperError::Configuration(_)));
        }
    }

    #[test]
    fn compress_repeats_the_source() {
        let mut z = dummy(3);
        let mut dst = [0u8; 9];
        assert_eq!(z.compress(b"abc", &mut dst).unwrap(), 9);
        assert_eq!(&dst, b"abcabcabc");
    }

    /// Decompression is a placeholder: it expands again instead of inverting.
    #[test]
    fn decompress_is_not_the_inverse() {
        let mut z = dummy(2);
        let mut packed = [0u8; 8];
        let n = z.compress(b"abcd", &mut packed).unwrap();
        let mut out = [0u8; 16];
        let m = z.decompress(&packed[..n], &mut out).unwrap();
        assert_eq!(m, 16);
        assert_eq!(&out, b"abcdabcdabcdabcd");
    }

    #[test]
    fn buffers_go_through_the_resolver() {
        let mut z = dummy(2);
        let mut src = ByteBuf::wrap_direct(b"xyz");
        let mut dst = ByteBuf::allocate(6);
        assert_eq!(z.compress_buffer(&mut src, &mut dst).unwrap(), 6);
        assert_eq!(dst.array().unwrap(), b"xyzxyz");
        assert_eq!(src.remaining(), 0);
    }

    #[test]
    fn dummy2_constructs_but_rejects_every_call() {
        let cfg = CodecConfig::default().with_algorithm(Algorithm::Dummy2);
        let mut z = QatZipper::open(cfg, &Device::with_instances(0), &Cleaner::new()).unwrap();
        let mut dst = [0u8; 8];
        match z.compress(b"abc", &mut dst) {
            Err(ZipperError::Argument(msg)) => assert!(msg.contains("DUMMY2")),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(z.decompress(b"abc", &mut dst), Err(ZipperError::Argument(_))));
        assert!(z.end().is_ok());
    }
}
