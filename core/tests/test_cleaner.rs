#[cfg(test)]
mod cleaner_tests {
    use qat_core::cleaner::Cleaner;
    use qat_core::config::{Algorithm, CodecConfig, Mode};
    use qat_core::native::Device;
    use qat_core::types::ZipperError;
    use qat_core::zipper::QatZipper;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn dropping_without_end_releases_the_session() {
        let dev = Device::with_instances(2);
        let cleaner = Cleaner::new();
        for algorithm in [Algorithm::Deflate, Algorithm::Zstd] {
            let cfg = CodecConfig::default().with_algorithm(algorithm);
            let z = QatZipper::open(cfg, &dev, &cleaner).unwrap();
            assert_eq!(cleaner.pending(), 1);
            assert_eq!(dev.open_sessions(), 1);
            assert_eq!(dev.in_use(), 1);
            drop(z);
            assert_eq!(cleaner.pending(), 0);
            assert_eq!(dev.open_sessions(), 0);
            assert_eq!(dev.in_use(), 0);
        }
    }

    #[test]
    fn end_consumes_the_registration() {
        let dev = Device::with_instances(1);
        let cleaner = Cleaner::new();
        let mut z = QatZipper::open(CodecConfig::default(), &dev, &cleaner).unwrap();
        z.end().unwrap();
        assert_eq!(cleaner.pending(), 0);
        assert!(!dev.is_started());

        assert_eq!(z.end(), Err(ZipperError::InvalidSession));
        drop(z);
        assert_eq!(dev.open_sessions(), 0);
    }

    #[test]
    fn failed_construction_registers_nothing() {
        let cleaner = Cleaner::new();
        let dev = Device::with_instances(0);
        assert!(QatZipper::open(CodecConfig::default(), &dev, &cleaner).is_err());
        assert_eq!(cleaner.pending(), 0);
    }

    #[test]
    fn facades_on_many_threads_all_release() {
        let dev = Device::with_instances(4);
        let cleaner = Cleaner::new();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let dev = Arc::clone(&dev);
                let cleaner = cleaner.clone();
                thread::spawn(move || {
                    let cfg = CodecConfig::default().with_mode(Mode::Auto);
                    let mut z = QatZipper::open(cfg, &dev, &cleaner).unwrap();
                    let input = vec![i as u8; 2048];
                    let mut dst = vec![0u8; z.max_compressed_length(input.len()).unwrap()];
                    assert!(z.compress(&input, &mut dst).unwrap() > 0);
                    if i % 2 == 0 {
                        z.end().unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(cleaner.pending(), 0);
        assert_eq!(dev.open_sessions(), 0);
        assert_eq!(dev.in_use(), 0);
        let stats = dev.stats();
        assert_eq!(stats.hw_jobs + stats.sw_jobs, 8);
    }

    #[test]
    fn global_registry_is_shared() {
        assert!(std::ptr::eq(Cleaner::global(), Cleaner::global()));
    }
}
