/// The 11 PHY rates of 802.11a, named by coding rate and modulation.
///
/// The non-standard 1/2-QAM64 combination does not exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rate {
    Bpsk1_2,
    Bpsk2_3,
    Bpsk3_4,
    Qpsk1_2,
    Qpsk2_3,
    Qpsk3_4,
    Qam16_1_2,
    Qam16_2_3,
    Qam16_3_4,
    Qam64_2_3,
    Qam64_3_4,
}

impl Rate {
    pub const ALL: [Rate; 11] = [
        Rate::Bpsk1_2,
        Rate::Bpsk2_3,
        Rate::Bpsk3_4,
        Rate::Qpsk1_2,
        Rate::Qpsk2_3,
        Rate::Qpsk3_4,
        Rate::Qam16_1_2,
        Rate::Qam16_2_3,
        Rate::Qam16_3_4,
        Rate::Qam64_2_3,
        Rate::Qam64_3_4,
    ];

    pub fn params(&self) -> RateParams {
        RateParams::new(*self)
    }
}

/// Per-rate coding and modulation parameters, keyed by [`Rate`] or by the
/// 4-bit rate field of a received SIGNAL header.
#[derive(Clone, Copy, Debug)]
pub struct RateParams {
    /// SIGNAL rate field
    pub rate_field: u8,
    /// Coded bits per symbol
    pub cbps: usize,
    /// Data bits per symbol
    pub dbps: usize,
    /// Bits per subcarrier
    pub bpsc: usize,
    /// Punctured length relative to the rate-1/2 mother code
    pub rel_rate: f64,
    pub rate: Rate,
    pub name: &'static str,
}

impl RateParams {
    pub fn new(rate: Rate) -> Self {
        match rate {
            Rate::Bpsk1_2 => Self::table(0xD, 48, 24, 1, 1.0, rate, "1/2 BPSK"),
            Rate::Bpsk2_3 => Self::table(0xE, 48, 32, 1, 3.0 / 4.0, rate, "2/3 BPSK"),
            Rate::Bpsk3_4 => Self::table(0xF, 48, 36, 1, 2.0 / 3.0, rate, "3/4 BPSK"),
            Rate::Qpsk1_2 => Self::table(0x5, 96, 48, 2, 1.0, rate, "1/2 QPSK"),
            Rate::Qpsk2_3 => Self::table(0x6, 96, 64, 2, 3.0 / 4.0, rate, "2/3 QPSK"),
            Rate::Qpsk3_4 => Self::table(0x7, 96, 72, 2, 2.0 / 3.0, rate, "3/4 QPSK"),
            Rate::Qam16_1_2 => Self::table(0x9, 192, 96, 4, 1.0, rate, "1/2 QAM16"),
            Rate::Qam16_2_3 => Self::table(0xA, 192, 128, 4, 3.0 / 4.0, rate, "2/3 QAM16"),
            Rate::Qam16_3_4 => Self::table(0xB, 192, 144, 4, 2.0 / 3.0, rate, "3/4 QAM16"),
            Rate::Qam64_2_3 => Self::table(0x1, 288, 192, 6, 3.0 / 4.0, rate, "2/3 QAM64"),
            Rate::Qam64_3_4 => Self::table(0x3, 288, 216, 6, 2.0 / 3.0, rate, "3/4 QAM64"),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn table(
        rate_field: u8,
        cbps: usize,
        dbps: usize,
        bpsc: usize,
        rel_rate: f64,
        rate: Rate,
        name: &'static str,
    ) -> Self {
        RateParams {
            rate_field,
            cbps,
            dbps,
            bpsc,
            rel_rate,
            rate,
            name,
        }
    }

    /// Look up the parameters for a rate field from a received header.
    /// Unknown fields yield `None`.
    pub fn from_rate_field(rate_field: u8) -> Option<Self> {
        Rate::ALL
            .iter()
            .map(|r| r.params())
            .find(|p| p.rate_field == rate_field)
    }

    /// Number of OFDM data symbols needed for a payload of `length` bytes:
    /// 16 SERVICE bits, the payload plus CRC-32, and 6 tail bits, rounded
    /// up to a whole symbol.
    pub fn n_symbols(&self, length: usize) -> usize {
        (16 + 8 * (length + 4) + 6).div_ceil(self.dbps)
    }
}
