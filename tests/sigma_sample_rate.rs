mod common;

use crate::common::*;
use libsigma_rs::{Error, Sigma, SAMPLERATES};

#[test]
fn rejects_rates_outside_the_canonical_list() {
    logging_init("sigma_sample_rate");

    let mut sigma = Sigma::from_link(MockLink::default(), Box::new(StaticFirmware(vec![])));
    for rate in [0u64, 300_000, 2_000_000, 400_000_000] {
        match sigma.set_samplerate(rate) {
            Err(Error::UnsupportedSamplerate(r)) => assert_eq!(r, rate),
            other => panic!("expected UnsupportedSamplerate, got {other:?}"),
        }
    }
}

#[test]
fn channel_count_follows_the_rate() -> anyhow::Result<()> {
    for (rate, channels) in [
        (200_000u64, 16),
        (50_000_000, 16),
        (100_000_000, 8),
        (200_000_000, 4),
    ] {
        let mut link = MockLink::default();
        script_firmware_upload(&mut link);

        let mut sigma = Sigma::from_link(link, Box::new(StaticFirmware(vec![0u8; 4])));
        sigma.set_samplerate(rate)?;
        assert_eq!(sigma.samplerate(), rate);
        assert_eq!(sigma.num_channels(), channels);
    }
    Ok(())
}

#[test]
fn sample_limit_becomes_a_deadline() {
    // One sample at 200 kHz: the duration itself rounds to nothing, but
    // two worst-case cluster drain times remain.
    let mut sigma = Sigma::from_link(MockLink::default(), Box::new(StaticFirmware(vec![])));
    sigma.set_limit_samples(1);
    assert_eq!(sigma.limit_msec(), 655);

    sigma.set_limit_samples(1000);
    assert_eq!(sigma.limit_msec(), 5 + 655);

    sigma.set_limit_samples(0);
    assert_eq!(sigma.limit_msec(), 0);
}

#[test]
fn deadline_recomputed_on_rate_change() -> anyhow::Result<()> {
    let mut link = MockLink::default();
    script_firmware_upload(&mut link);

    let mut sigma = Sigma::from_link(link, Box::new(StaticFirmware(vec![0u8; 4])));
    sigma.set_limit_samples(1000);
    assert_eq!(sigma.limit_msec(), 660);

    // The limit was configured first; the rate change re-derives it.
    sigma.set_samplerate(1_000_000)?;
    assert_eq!(sigma.limit_msec(), 1 + 131);
    Ok(())
}

#[test]
fn canonical_list_is_sorted_and_complete() {
    assert_eq!(SAMPLERATES.len(), 10);
    assert!(SAMPLERATES.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(SAMPLERATES[0], 200_000);
    assert_eq!(SAMPLERATES[9], 200_000_000);
}
