//! Profit-sharing — split settled funds to receivers, return splits,
//! release frozen remainders and manage receivers.

pub mod client;
pub mod wire;

pub use wire::{
    AddReceiverRequest, OrderState, ProfitsharingOrder, ProfitsharingRequest, Receiver,
    ReceiverResponse, ReceiverResult, ReceiverType, RelationType, ReturnOrder, ReturnRequest,
    SplitResult, SplittableAmount,
};
