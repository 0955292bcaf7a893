use crate::domain::requests::{
    order_item::UpdateOrderItemRecordRequest,
    shipping_address::UpdateShippingAddressRecordRequest,
};

/// One undo step for a write that already succeeded.
#[derive(Debug, Clone)]
pub enum Compensation {
    DeleteOrder(i32),
    ReturnStock { product_id: i32, quantity: i32 },
    TakeStock { product_id: i32, quantity: i32 },
    DeleteOrderItem(i32),
    RevertOrderItem(UpdateOrderItemRecordRequest),
    TrashOrderItem(i32),
    RestoreOrderItem(i32),
    DeleteShippingAddress(i32),
    RevertShippingAddress(UpdateShippingAddressRecordRequest),
}

/// Compensations of one command, unwound last-in first-out.
#[derive(Debug, Default)]
pub struct Saga {
    steps: Vec<Compensation>,
}

impl Saga {
    pub fn push(&mut self, step: Compensation) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn into_unwind_order(self) -> impl Iterator<Item = Compensation> {
        self.steps.into_iter().rev()
    }
}
