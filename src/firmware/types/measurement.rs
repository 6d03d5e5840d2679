#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AuxReadings {
    pub ax: i16,
    pub ay: i16,
    pub az: i16,
    pub fp_power: f32,
    pub rx_power: f32,
    pub eta: f32,
    pub quality: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeasurementRecord {
    pub timestamp_us: u64,
    pub source_id: u16,
    pub distance_m: f32,
    pub aux: AuxReadings,
}

/// A finished ranging exchange as reported by the radio stack.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RangeSample {
    pub source_id: u16,
    pub distance_m: f32,
    pub rx_power: f32,
    pub fp_power: f32,
    pub quality: f32,
    pub accel: [i16; 3],
}

impl RangeSample {
    pub fn eta(&self) -> f32 {
        if self.fp_power != 0.0 {
            self.rx_power / self.fp_power
        } else {
            0.0
        }
    }

    pub fn aux(&self) -> AuxReadings {
        AuxReadings {
            ax: self.accel[0],
            ay: self.accel[1],
            az: self.accel[2],
            fp_power: self.fp_power,
            rx_power: self.rx_power,
            eta: self.eta(),
            quality: self.quality,
        }
    }
}
