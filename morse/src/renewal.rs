//! Optional session renewal: when a decoder reports a long pause and
//! `enable_renewal` is set, retire it and start a fresh one rather than
//! carry stale learned ratios across what looks like a new transmission.

use crate::codebook::Codebook;
use crate::config::MorseConfig;
use crate::decoder::MorseDecoder;
use crate::error::Result;
use crate::longpause::LastState;
use crate::symbol::Sample;

/// Wraps a [`MorseDecoder`], swapping it out for a fresh one whenever the
/// current decoder's last processed gap was flagged as a long pause and
/// `config.enable_renewal` is set. Disabled (the default), this is a
/// transparent pass-through.
pub struct RenewingDecoder {
    config: MorseConfig,
    codebook: Codebook,
    decoder: MorseDecoder,
}

impl RenewingDecoder {
    pub fn spawn(config: MorseConfig, codebook: Codebook) -> Self {
        let decoder = MorseDecoder::spawn(config, codebook.clone());
        RenewingDecoder {
            config,
            codebook,
            decoder,
        }
    }

    pub fn put(&mut self, sample: Sample) -> Result<()> {
        self.decoder.put(sample)
    }

    pub fn get(&mut self) -> Result<String> {
        let out = self.decoder.get()?;
        self.maybe_renew();
        Ok(out)
    }

    pub fn try_get(&mut self) -> Result<String> {
        let out = self.decoder.try_get()?;
        self.maybe_renew();
        Ok(out)
    }

    /// Block until every item `put` on the *current* inner decoder has been
    /// processed. A renewal that happens afterwards starts a fresh decoder
    /// with nothing outstanding, so there's nothing more to wait for.
    pub fn wait(&mut self) -> Result<()> {
        self.decoder.wait()
    }

    fn maybe_renew(&mut self) {
        if self.config.enable_renewal && self.decoder.last_state() == LastState::LongPause {
            tracing::info!("long pause detected, renewing decoder session");
            let _ = self.decoder.close();
            self.decoder = MorseDecoder::spawn(self.config, self.codebook.clone());
        }
    }

    pub fn close(&mut self) -> Result<()> {
        self.decoder.close()
    }

    pub fn closed(&self) -> bool {
        self.decoder.closed()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn disabled_renewal_keeps_the_same_decoder_alive() {
        let config = MorseConfig {
            enable_renewal: false,
            ..MorseConfig::default()
        };
        let mut rd = RenewingDecoder::spawn(config, Codebook::itu());
        rd.put((true, 300.0)).unwrap();
        rd.close().unwrap();
    }

    #[test]
    fn enabled_renewal_does_not_panic_on_a_quiet_stream() {
        let config = MorseConfig {
            enable_renewal: true,
            ..MorseConfig::default()
        };
        let mut rd = RenewingDecoder::spawn(config, Codebook::itu());
        rd.put((true, 300.0)).unwrap();
        rd.close().unwrap();
    }
}
