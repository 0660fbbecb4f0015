use mirror_serde::{ByteWrite, Serde, SerdeErr, StreamReader};

/// One period of source-side performance telemetry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerfReport {
    /// Time spent in each component kind's frame work over wall-clock time,
    /// indexed like `ComponentKind::ALL`
    pub feature_ratios: Vec<f32>,
    /// Diagnostic counters, empty unless diagnostic mode was on
    pub counters: Vec<(String, i32)>,
    pub materials_updated: i32,
}

impl PerfReport {
    pub fn counter(&self, label: &str) -> Option<i32> {
        self.counters
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, count)| *count)
    }
}

fn read_count(
    reader: &mut StreamReader,
    type_name: &'static str,
    min_entry_size: usize,
) -> Result<usize, SerdeErr> {
    let count = i32::de(reader)?;
    if count < 0 {
        return Err(SerdeErr::InvalidValue {
            type_name,
            value: u64::from(count as u32),
        });
    }
    let count = count as usize;
    let needed = count.saturating_mul(min_entry_size);
    if needed > reader.remaining() {
        return Err(SerdeErr::UnexpectedEnd {
            needed,
            remaining: reader.remaining(),
        });
    }
    Ok(count)
}

impl Serde for PerfReport {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        (self.feature_ratios.len() as i32).ser(writer);
        for ratio in &self.feature_ratios {
            ratio.ser(writer);
        }
        (self.counters.len() as i32).ser(writer);
        for (label, count) in &self.counters {
            label.ser(writer);
            count.ser(writer);
        }
        self.materials_updated.ser(writer);
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        let feature_count = read_count(reader, "perf feature count", 4)?;
        let mut feature_ratios = Vec::with_capacity(feature_count);
        for _ in 0..feature_count {
            feature_ratios.push(f32::de(reader)?);
        }

        // label length byte + i32
        let counter_count = read_count(reader, "perf counter count", 5)?;
        let mut counters = Vec::with_capacity(counter_count);
        for _ in 0..counter_count {
            let label = String::de(reader)?;
            let count = i32::de(reader)?;
            counters.push((label, count));
        }

        Ok(Self {
            feature_ratios,
            counters,
            materials_updated: i32::de(reader)?,
        })
    }
}
