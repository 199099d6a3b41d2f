use num_complex::Complex32;

/// In-band marker attached to samples and symbols as they move down the
/// receive chain. Tags are the only cross-stage signaling besides the
/// sample values themselves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tag {
    #[default]
    None,
    /// Short training sequence plateau reached
    StsStart,
    /// Correlation plateau fell off
    StsEnd,
    /// First sample handed to the FFT for the first LTS symbol
    Lts1,
    /// Same for the second LTS symbol
    Lts2,
    /// First frequency-domain LTS symbol
    LtsStart,
    /// SIGNAL symbol of a frame
    StartOfFrame,
}

/// One complex baseband sample with its tag.
#[derive(Clone, Copy, Debug, Default)]
pub struct TaggedSample {
    pub sample: Complex32,
    pub tag: Tag,
}

impl TaggedSample {
    pub fn new(sample: Complex32) -> Self {
        TaggedSample {
            sample,
            tag: Tag::None,
        }
    }
}

/// A fixed-size OFDM symbol with one tag. `N` is 64 for full symbols and
/// 48 once pilots and nulls have been stripped.
#[derive(Clone, Copy, Debug)]
pub struct TaggedSymbol<const N: usize> {
    pub samples: [Complex32; N],
    pub tag: Tag,
}

impl<const N: usize> Default for TaggedSymbol<N> {
    fn default() -> Self {
        TaggedSymbol {
            samples: [Complex32::new(0.0, 0.0); N],
            tag: Tag::None,
        }
    }
}
