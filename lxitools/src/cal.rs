//! Calibration of raw housekeeping values into physical quantities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical instrument unit. Units 1 and 2 differ slightly in the analog
/// calibration of the current monitors.
#[derive(Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum HardwareUnit {
    Unit1,
    Unit2,
}

impl Default for HardwareUnit {
    fn default() -> Self {
        HardwareUnit::Unit1
    }
}

impl FromStr for HardwareUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "1" | "unit1" | "unit_1" => Ok(HardwareUnit::Unit1),
            "2" | "unit2" | "unit_2" => Ok(HardwareUnit::Unit2),
            _ => Err(format!("unknown hardware unit '{}', expected 1 or 2", s)),
        }
    }
}

#[derive(Clone, Copy, Eq, PartialEq, Debug, thiserror::Error)]
pub enum CalibrationError {
    #[error("unknown housekeeping channel {0}, ids run from 0 to 15")]
    UnknownChannel(u8),
}

/// Housekeeping channel ids as multiplexed in the frame
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(u8)]
pub enum HkId {
    PinPullerTemp = 0,
    OpticsTemp = 1,
    LexiBaseTemp = 2,
    HvSupplyTemp = 3,
    /// +5.2V current monitor
    Imon5V2 = 4,
    /// +10V current monitor
    Imon10V = 5,
    /// +3.3V current monitor
    Imon3V3 = 6,
    AnodeVoltMon = 7,
    /// +28V current monitor
    Imon28V = 8,
    AdcGround = 9,
    CmdCount = 10,
    PinPullerArmed = 11,
    Unused1 = 12,
    Unused2 = 13,
    /// MCP high voltage after automatic change
    HvMcpAuto = 14,
    /// MCP high voltage after manual change
    HvMcpMan = 15,
}

impl HkId {
    pub const ALL: [HkId; 16] = [
        HkId::PinPullerTemp,
        HkId::OpticsTemp,
        HkId::LexiBaseTemp,
        HkId::HvSupplyTemp,
        HkId::Imon5V2,
        HkId::Imon10V,
        HkId::Imon3V3,
        HkId::AnodeVoltMon,
        HkId::Imon28V,
        HkId::AdcGround,
        HkId::CmdCount,
        HkId::PinPullerArmed,
        HkId::Unused1,
        HkId::Unused2,
        HkId::HvMcpAuto,
        HkId::HvMcpMan,
    ];

    /// Column name used in exported housekeeping tables
    pub fn name(self) -> &'static str {
        match self {
            HkId::PinPullerTemp => "PinPullerTemp",
            HkId::OpticsTemp => "OpticsTemp",
            HkId::LexiBaseTemp => "LEXIbaseTemp",
            HkId::HvSupplyTemp => "HVsupplyTemp",
            HkId::Imon5V2 => "+5.2V_Imon",
            HkId::Imon10V => "+10V_Imon",
            HkId::Imon3V3 => "+3.3V_Imon",
            HkId::AnodeVoltMon => "AnodeVoltMon",
            HkId::Imon28V => "+28V_Imon",
            HkId::AdcGround => "ADC_Ground",
            HkId::CmdCount => "Cmd_count",
            HkId::PinPullerArmed => "Pinpuller_Armed",
            HkId::Unused1 => "Unused1",
            HkId::Unused2 => "Unused2",
            HkId::HvMcpAuto => "HVmcpAuto",
            HkId::HvMcpMan => "HVmcpMan",
        }
    }

    /// Apply this channel's transfer function to a raw value
    pub fn calibrate(self, raw: u16, vpc: f64, unit: HardwareUnit) -> f64 {
        use HardwareUnit::*;
        let v = raw as f64 * vpc;
        match self {
            HkId::PinPullerTemp
            | HkId::OpticsTemp
            | HkId::LexiBaseTemp
            | HkId::HvSupplyTemp => (v - 2.73) * 100.0,
            HkId::Imon5V2 => match unit {
                Unit1 => v * 1e3 / 18.0,
                Unit2 => (v - 1.129) * 1e3 / 21.456,
            },
            HkId::Imon3V3 => match unit {
                Unit1 => (v + 0.0178) * 1e3 / 9.131,
                Unit2 => (v - 0.029) * 1e3 / 18.0,
            },
            // Same coefficients for both units until the hardware team
            // confirms otherwise
            HkId::Imon28V => match unit {
                Unit1 | Unit2 => (v + 0.00747) * 1e3 / 17.94,
            },
            HkId::Imon10V
            | HkId::AnodeVoltMon
            | HkId::AdcGround
            | HkId::CmdCount
            | HkId::HvMcpAuto
            | HkId::HvMcpMan => v,
            HkId::PinPullerArmed | HkId::Unused1 | HkId::Unused2 => raw as f64,
        }
    }
}

impl TryFrom<u8> for HkId {
    type Error = CalibrationError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        HkId::ALL
            .get(id as usize)
            .copied()
            .ok_or(CalibrationError::UnknownChannel(id))
    }
}

impl fmt::Display for HkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Calibrate `raw` as read from housekeeping channel `hk_id`
pub fn calibrate(
    hk_id: u8,
    raw: u16,
    volts_per_count: f64,
    unit: HardwareUnit,
) -> Result<f64, CalibrationError> {
    let id = HkId::try_from(hk_id)?;
    Ok(id.calibrate(raw, volts_per_count, unit))
}
