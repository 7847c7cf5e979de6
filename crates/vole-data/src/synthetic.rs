// Logic-gate datasets
//
// The four binary input pairs (0,0) (0,1) (1,0) (1,1) as 2×1 columns,
// with 1×1 targets from the chosen truth table.

use std::fmt;
use std::str::FromStr;

use vole_core::error::{Error, Result};
use vole_core::tensor::Tensor;

use crate::dataset::TensorDataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicGate {
    Xor,
    And,
    Or,
}

impl LogicGate {
    pub fn eval(self, a: bool, b: bool) -> bool {
        match self {
            LogicGate::Xor => a ^ b,
            LogicGate::And => a && b,
            LogicGate::Or => a || b,
        }
    }
}

impl fmt::Display for LogicGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogicGate::Xor => "XOR",
            LogicGate::And => "AND",
            LogicGate::Or => "OR",
        };
        f.write_str(s)
    }
}

impl FromStr for LogicGate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "xor" => Ok(LogicGate::Xor),
            "and" => Ok(LogicGate::And),
            "or" => Ok(LogicGate::Or),
            other => Err(Error::msg(format!(
                "unknown logic gate '{other}', expected xor, and or or"
            ))),
        }
    }
}

/// The full truth table of `gate` as a four-sample dataset.
pub fn logic_gate_dataset(gate: LogicGate) -> TensorDataset {
    let bit = |b: bool| f32::from(u8::from(b));
    let pairs = [(false, false), (false, true), (true, false), (true, true)]
        .into_iter()
        .map(|(a, b)| {
            (
                Tensor::column(&[bit(a), bit(b)]),
                Tensor::column(&[bit(gate.eval(a, b))]),
            )
        })
        .collect();
    TensorDataset::from_pairs(pairs)
}
