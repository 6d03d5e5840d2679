use core::fmt::Write;

use heapless::String;

use crate::firmware::{config::TELEMETRY_PAYLOAD_MAX, types::MeasurementRecord};

pub type TelemetryPayload = String<TELEMETRY_PAYLOAD_MAX>;

/// Fixed field order, two decimals on every float.
pub fn format_telemetry(
    anchor_id: u16,
    record: &MeasurementRecord,
) -> Result<TelemetryPayload, core::fmt::Error> {
    let aux = &record.aux;
    let mut payload = TelemetryPayload::new();
    write!(
        &mut payload,
        "{{\"id_ancora\":{},\"id_tag\":{},\"distancia\":{:.2},\
         \"ax\":{},\"ay\":{},\"az\":{},\
         \"fp\":{:.2},\"rx\":{:.2},\"eta\":{:.2},\"quality\":{:.2}}}",
        anchor_id,
        record.source_id,
        record.distance_m,
        aux.ax,
        aux.ay,
        aux.az,
        aux.fp_power,
        aux.rx_power,
        aux.eta,
        aux.quality,
    )?;
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firmware::types::AuxReadings;

    #[test]
    fn formats_fixed_schema() {
        let record = MeasurementRecord {
            timestamp_us: 1,
            source_id: 0x1A2B,
            distance_m: 1.5,
            aux: AuxReadings {
                ax: -12,
                ay: 0,
                az: 1024,
                fp_power: -81.25,
                rx_power: -78.5,
                eta: 0.966,
                quality: 7.0,
            },
        };
        let payload = format_telemetry(2, &record).expect("fits");
        assert_eq!(
            payload.as_str(),
            "{\"id_ancora\":2,\"id_tag\":6699,\"distancia\":1.50,\
             \"ax\":-12,\"ay\":0,\"az\":1024,\
             \"fp\":-81.25,\"rx\":-78.50,\"eta\":0.97,\"quality\":7.00}"
        );
    }

    #[test]
    fn worst_case_fits_buffer() {
        let record = MeasurementRecord {
            timestamp_us: u64::MAX,
            source_id: u16::MAX,
            distance_m: -99999.99,
            aux: AuxReadings {
                ax: i16::MIN,
                ay: i16::MIN,
                az: i16::MIN,
                fp_power: -99999.99,
                rx_power: -99999.99,
                eta: -99999.99,
                quality: -99999.99,
            },
        };
        assert!(format_telemetry(u16::MAX, &record).is_ok());
    }
}
