//! Relayer assembles Safe transactions, collects owner signatures and submits them to a
//! relay service that pays the gas

mod assembler;
mod flow;
mod gelato;

pub use assembler::{SafeAccount, TransactionAssembler};
pub use flow::{FlowConfig, GaslessFlow, PreparedTransaction, RelayOp};
pub use gelato::{GelatoRelay, RelayConfig};
