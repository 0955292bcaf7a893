#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use order::{
    abstract_trait::{
        directory::{MerchantRepositoryTrait, UserRepositoryTrait},
        lifecycle_intent::LifecycleIntentRepositoryTrait,
        order::repository::{OrderCommandRepositoryTrait, OrderQueryRepositoryTrait},
        order_item::repository::{OrderItemCommandRepositoryTrait, OrderItemQueryRepositoryTrait},
        product::ProductCatalogTrait,
        shipping_address::ShippingAddressRepositoryTrait,
    },
    domain::{
        requests::{
            order::{
                CreateOrderItemRequest, CreateOrderRecordRequest, CreateOrderRequest,
                FindAllOrder, UpdateOrderRecordRequest,
            },
            order_item::{CreateOrderItemRecordRequest, UpdateOrderItemRecordRequest},
            shipping_address::{
                CreateShippingAddressRecordRequest, CreateShippingAddressRequest,
                UpdateShippingAddressRecordRequest,
            },
        },
        state::LifecycleAction,
    },
    model::{
        lifecycle_intent::LifecycleIntent, merchant::Merchant, order::Order,
        order_item::OrderItem, product::Product, shipping_address::ShippingAddress, user::User,
    },
    service::order::{
        OrderCommandConfig, OrderCommandService, OrderCommandServiceDeps, OrderQueryService,
    },
};
use shared::{
    errors::RepositoryError,
    utils::{Method, MetricsSink, Status},
};
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

#[derive(Default)]
pub struct Db {
    pub merchants: HashMap<i32, Merchant>,
    pub users: HashMap<i32, User>,
    pub products: HashMap<i32, Product>,
    pub orders: BTreeMap<i32, Order>,
    pub items: BTreeMap<i32, OrderItem>,
    pub shipping: BTreeMap<i32, ShippingAddress>,
    pub intents: BTreeMap<i32, LifecycleIntent>,
    next_id: i32,
    failpoints: HashSet<&'static str>,
    delays: HashMap<&'static str, Duration>,
    settles: HashMap<&'static str, Duration>,
}

impl Db {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Every collaborator trait over one shared in-memory database, with per-method
/// failure and delay injection.
#[derive(Clone, Default)]
pub struct MemoryStore {
    db: Arc<Mutex<Db>>,
}

impl MemoryStore {
    pub fn db(&self) -> MutexGuard<'_, Db> {
        self.db.lock().expect("db lock")
    }

    pub fn fail(&self, method: &'static str) {
        self.db().failpoints.insert(method);
    }

    pub fn heal(&self, method: &'static str) {
        self.db().failpoints.remove(method);
    }

    pub fn delay(&self, method: &'static str, delay: Duration) {
        self.db().delays.insert(method, delay);
    }

    /// Holds the reply of `method` back after its change is applied, like a write whose
    /// commit acknowledgement is slow.
    pub fn settle(&self, method: &'static str, delay: Duration) {
        self.db().settles.insert(method, delay);
    }

    async fn leave(&self, method: &'static str) {
        let delay = self.db().settles.get(method).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    async fn enter(&self, method: &'static str) -> Result<(), RepositoryError> {
        let delay = self.db().delays.get(method).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.db().failpoints.contains(method) {
            return Err(RepositoryError::Custom(format!(
                "injected failure in {method}"
            )));
        }
        Ok(())
    }

    pub fn seed_merchant(&self, merchant_id: i32) {
        self.db().merchants.insert(
            merchant_id,
            Merchant {
                merchant_id,
                name: format!("merchant-{merchant_id}"),
            },
        );
    }

    pub fn seed_user(&self, user_id: i32) {
        self.db().users.insert(
            user_id,
            User {
                user_id,
                email: format!("user{user_id}@example.com"),
            },
        );
    }

    pub fn seed_product(&self, product_id: i32, price: i32, count_in_stock: i32) {
        let now = Some(Utc::now().naive_utc());
        self.db().products.insert(
            product_id,
            Product {
                product_id,
                name: format!("product-{product_id}"),
                price,
                count_in_stock,
                created_at: now,
                updated_at: now,
            },
        );
    }

    pub fn set_price(&self, product_id: i32, price: i32) {
        if let Some(product) = self.db().products.get_mut(&product_id) {
            product.price = price;
        }
    }

    pub fn stock(&self, product_id: i32) -> i32 {
        self.db().products[&product_id].count_in_stock
    }

    pub fn order(&self, order_id: i32) -> Option<Order> {
        self.db().orders.get(&order_id).cloned()
    }

    pub fn order_count(&self) -> usize {
        self.db().orders.len()
    }

    pub fn items_of(&self, order_id: i32) -> Vec<OrderItem> {
        self.db()
            .items
            .values()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect()
    }

    pub fn item_count(&self) -> usize {
        self.db().items.len()
    }

    pub fn shipping_of(&self, order_id: i32) -> Option<ShippingAddress> {
        self.db()
            .shipping
            .values()
            .find(|s| s.order_id == order_id)
            .cloned()
    }

    pub fn shipping_count(&self) -> usize {
        self.db().shipping.len()
    }

    pub fn pending_intents(&self) -> Vec<LifecycleIntent> {
        self.db()
            .intents
            .values()
            .filter(|i| i.completed_at.is_none())
            .cloned()
            .collect()
    }

    pub fn intent_count(&self) -> usize {
        self.db().intents.len()
    }

    /// Marks one item trashed without touching its order.
    pub fn trash_item_directly(&self, order_item_id: i32) {
        if let Some(item) = self.db().items.get_mut(&order_item_id) {
            item.deleted_at = Some(Utc::now().naive_utc());
        }
    }

    pub fn remove_shipping_directly(&self, order_id: i32) {
        self.db().shipping.retain(|_, s| s.order_id != order_id);
    }

    pub fn insert_pending_intent(&self, order_id: i32, action: LifecycleAction) -> i32 {
        let mut db = self.db();
        let intent_id = db.next_id();
        db.intents.insert(
            intent_id,
            LifecycleIntent {
                intent_id,
                order_id,
                action,
                created_at: Some(Utc::now().naive_utc()),
                leased_until: None,
                completed_at: None,
            },
        );
        intent_id
    }

    pub fn remove_product_directly(&self, product_id: i32) {
        self.db().products.remove(&product_id);
    }

    fn page(&self, req: &FindAllOrder, trashed: bool) -> (Vec<Order>, i64) {
        let db = self.db();
        let search = req.search.trim();
        let mut matching: Vec<Order> = db
            .orders
            .values()
            .filter(|o| o.deleted_at.is_some() == trashed)
            .filter(|o| {
                search.is_empty()
                    || o.order_id.to_string().contains(search)
                    || o.user_id.to_string().contains(search)
            })
            .cloned()
            .collect();
        matching.reverse();

        let total = matching.len() as i64;
        let offset = ((req.page - 1).max(0) * req.page_size) as usize;
        let page = matching
            .into_iter()
            .skip(offset)
            .take(req.page_size as usize)
            .collect();
        (page, total)
    }
}

fn now() -> Option<chrono::NaiveDateTime> {
    Some(Utc::now().naive_utc())
}

fn lease_from_now(lease: Duration) -> Option<chrono::NaiveDateTime> {
    let lease = chrono::Duration::from_std(lease).expect("lease fits chrono");
    Some(Utc::now().naive_utc() + lease)
}

#[async_trait]
impl MerchantRepositoryTrait for MemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Merchant>, RepositoryError> {
        self.enter("find_merchant").await?;
        Ok(self.db().merchants.get(&id).cloned())
    }
}

#[async_trait]
impl UserRepositoryTrait for MemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepositoryError> {
        self.enter("find_user").await?;
        Ok(self.db().users.get(&id).cloned())
    }
}

#[async_trait]
impl ProductCatalogTrait for MemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, RepositoryError> {
        self.enter("find_product").await?;
        Ok(self.db().products.get(&id).cloned())
    }

    async fn decrease_stock(
        &self,
        product_id: i32,
        qty: i32,
    ) -> Result<Option<Product>, RepositoryError> {
        self.enter("decrease_stock").await?;
        let taken = {
            let mut db = self.db();
            match db.products.get_mut(&product_id) {
                Some(product) if product.count_in_stock >= qty => {
                    product.count_in_stock -= qty;
                    product.updated_at = now();
                    Some(product.clone())
                }
                _ => None,
            }
        };
        self.leave("decrease_stock").await;
        Ok(taken)
    }

    async fn increase_stock(&self, product_id: i32, qty: i32) -> Result<Product, RepositoryError> {
        self.enter("increase_stock").await?;
        let mut db = self.db();
        let product = db
            .products
            .get_mut(&product_id)
            .ok_or(RepositoryError::NotFound)?;
        product.count_in_stock += qty;
        product.updated_at = now();
        Ok(product.clone())
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for MemoryStore {
    async fn create_order(&self, req: &CreateOrderRecordRequest) -> Result<Order, RepositoryError> {
        self.enter("create_order").await?;
        let mut db = self.db();
        let order_id = db.next_id();
        let order = Order {
            order_id,
            merchant_id: req.merchant_id,
            user_id: req.user_id,
            total_price: req.total_price,
            created_at: now(),
            updated_at: now(),
            deleted_at: None,
        };
        db.orders.insert(order_id, order.clone());
        Ok(order)
    }

    async fn update_order(&self, req: &UpdateOrderRecordRequest) -> Result<Order, RepositoryError> {
        self.enter("update_order").await?;
        let mut db = self.db();
        let order = db
            .orders
            .get_mut(&req.order_id)
            .ok_or(RepositoryError::NotFound)?;
        order.user_id = req.user_id;
        order.total_price = req.total_price;
        order.updated_at = now();
        Ok(order.clone())
    }

    async fn trash_order(&self, id: i32) -> Result<Order, RepositoryError> {
        self.enter("trash_order").await?;
        let mut db = self.db();
        let order = db.orders.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        if order.deleted_at.is_none() {
            order.deleted_at = now();
        }
        Ok(order.clone())
    }

    async fn restore_order(&self, id: i32) -> Result<Order, RepositoryError> {
        self.enter("restore_order").await?;
        let mut db = self.db();
        let order = db.orders.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        order.deleted_at = None;
        Ok(order.clone())
    }

    async fn delete_order(&self, id: i32) -> Result<bool, RepositoryError> {
        self.enter("delete_order").await?;
        let mut db = self.db();
        if db.items.values().any(|i| i.order_id == id) {
            return Err(RepositoryError::ForeignKey(format!(
                "order {id} still has order items"
            )));
        }
        Ok(db.orders.remove(&id).is_some())
    }

    async fn restore_all_orders(&self) -> Result<u64, RepositoryError> {
        self.enter("restore_all_orders").await?;
        let mut db = self.db();
        let mut restored = 0;
        for order in db.orders.values_mut().filter(|o| o.deleted_at.is_some()) {
            order.deleted_at = None;
            restored += 1;
        }
        Ok(restored)
    }

    async fn delete_all_orders(&self) -> Result<Vec<i32>, RepositoryError> {
        self.enter("delete_all_orders").await?;
        let mut db = self.db();
        let trashed: Vec<i32> = db
            .orders
            .values()
            .filter(|o| o.deleted_at.is_some())
            .map(|o| o.order_id)
            .collect();
        if db.items.values().any(|i| trashed.contains(&i.order_id)) {
            return Err(RepositoryError::ForeignKey(
                "trashed orders still have order items".into(),
            ));
        }
        for id in &trashed {
            db.orders.remove(id);
        }
        Ok(trashed)
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for MemoryStore {
    async fn find_active(&self, req: &FindAllOrder) -> Result<(Vec<Order>, i64), RepositoryError> {
        self.enter("find_active").await?;
        Ok(self.page(req, false))
    }

    async fn find_trashed(
        &self,
        req: &FindAllOrder,
    ) -> Result<(Vec<Order>, i64), RepositoryError> {
        self.enter("find_trashed").await?;
        Ok(self.page(req, true))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Order>, RepositoryError> {
        self.enter("find_order").await?;
        Ok(self.db().orders.get(&id).cloned())
    }
}

#[async_trait]
impl OrderItemCommandRepositoryTrait for MemoryStore {
    async fn create_order_item(
        &self,
        req: &CreateOrderItemRecordRequest,
    ) -> Result<OrderItem, RepositoryError> {
        self.enter("create_order_item").await?;
        let mut db = self.db();
        if !db.orders.contains_key(&req.order_id) {
            return Err(RepositoryError::ForeignKey(format!(
                "order {} does not exist",
                req.order_id
            )));
        }
        let order_item_id = db.next_id();
        let item = OrderItem {
            order_item_id,
            order_id: req.order_id,
            product_id: req.product_id,
            quantity: req.quantity,
            price: req.price,
            created_at: now(),
            updated_at: now(),
            deleted_at: None,
        };
        db.items.insert(order_item_id, item.clone());
        Ok(item)
    }

    async fn update_order_item(
        &self,
        req: &UpdateOrderItemRecordRequest,
    ) -> Result<OrderItem, RepositoryError> {
        self.enter("update_order_item").await?;
        let mut db = self.db();
        let item = db
            .items
            .get_mut(&req.order_item_id)
            .filter(|i| i.order_id == req.order_id)
            .ok_or(RepositoryError::NotFound)?;
        item.product_id = req.product_id;
        item.quantity = req.quantity;
        item.price = req.price;
        item.updated_at = now();
        Ok(item.clone())
    }

    async fn trashed_order_item(&self, order_item_id: i32) -> Result<OrderItem, RepositoryError> {
        self.enter("trashed_order_item").await?;
        let mut db = self.db();
        let item = db
            .items
            .get_mut(&order_item_id)
            .ok_or(RepositoryError::NotFound)?;
        if item.deleted_at.is_none() {
            item.deleted_at = now();
        }
        Ok(item.clone())
    }

    async fn restore_order_item(&self, order_item_id: i32) -> Result<OrderItem, RepositoryError> {
        self.enter("restore_order_item").await?;
        let mut db = self.db();
        let item = db
            .items
            .get_mut(&order_item_id)
            .ok_or(RepositoryError::NotFound)?;
        item.deleted_at = None;
        Ok(item.clone())
    }

    async fn delete_order_item_permanent(
        &self,
        order_item_id: i32,
    ) -> Result<bool, RepositoryError> {
        self.enter("delete_order_item_permanent").await?;
        Ok(self.db().items.remove(&order_item_id).is_some())
    }

    async fn restore_all_order_item(&self) -> Result<u64, RepositoryError> {
        self.enter("restore_all_order_item").await?;
        let mut db = self.db();
        let mut restored = 0;
        for item in db.items.values_mut().filter(|i| i.deleted_at.is_some()) {
            item.deleted_at = None;
            restored += 1;
        }
        Ok(restored)
    }

    async fn delete_all_order_item_permanent(&self) -> Result<Vec<OrderItem>, RepositoryError> {
        self.enter("delete_all_order_item_permanent").await?;
        let mut db = self.db();
        let trashed: Vec<OrderItem> = db
            .items
            .values()
            .filter(|i| i.deleted_at.is_some())
            .cloned()
            .collect();
        for item in &trashed {
            db.items.remove(&item.order_item_id);
        }
        Ok(trashed)
    }
}

#[async_trait]
impl OrderItemQueryRepositoryTrait for MemoryStore {
    async fn find_order_item_by_order(
        &self,
        order_id: i32,
    ) -> Result<Vec<OrderItem>, RepositoryError> {
        self.enter("find_order_item_by_order").await?;
        Ok(self.items_of(order_id))
    }

    async fn calculate_total_price(&self, order_id: i32) -> Result<i64, RepositoryError> {
        self.enter("calculate_total_price").await?;
        Ok(self
            .items_of(order_id)
            .iter()
            .filter(|i| !i.is_trashed())
            .map(OrderItem::subtotal)
            .sum())
    }
}

#[async_trait]
impl ShippingAddressRepositoryTrait for MemoryStore {
    async fn create_shipping_address(
        &self,
        req: &CreateShippingAddressRecordRequest,
    ) -> Result<ShippingAddress, RepositoryError> {
        self.enter("create_shipping_address").await?;
        let mut db = self.db();
        if db.shipping.values().any(|s| s.order_id == req.order_id) {
            return Err(RepositoryError::Conflict(format!(
                "order {} already has a shipping address",
                req.order_id
            )));
        }
        let shipping_address_id = db.next_id();
        let details = &req.details;
        let shipping = ShippingAddress {
            shipping_address_id,
            order_id: req.order_id,
            address: details.address.clone(),
            province: details.province.clone(),
            city: details.city.clone(),
            country: details.country.clone(),
            courier: details.courier.clone(),
            shipping_method: details.shipping_method.clone(),
            shipping_cost: details.shipping_cost,
            created_at: now(),
            updated_at: now(),
            deleted_at: None,
        };
        db.shipping.insert(shipping_address_id, shipping.clone());
        Ok(shipping)
    }

    async fn update_shipping_address(
        &self,
        req: &UpdateShippingAddressRecordRequest,
    ) -> Result<ShippingAddress, RepositoryError> {
        self.enter("update_shipping_address").await?;
        let mut db = self.db();
        let shipping = db
            .shipping
            .get_mut(&req.shipping_address_id)
            .filter(|s| s.order_id == req.order_id)
            .ok_or(RepositoryError::NotFound)?;
        let details = &req.details;
        shipping.address = details.address.clone();
        shipping.province = details.province.clone();
        shipping.city = details.city.clone();
        shipping.country = details.country.clone();
        shipping.courier = details.courier.clone();
        shipping.shipping_method = details.shipping_method.clone();
        shipping.shipping_cost = details.shipping_cost;
        shipping.updated_at = now();
        Ok(shipping.clone())
    }

    async fn find_by_order(&self, order_id: i32) -> Result<Option<ShippingAddress>, RepositoryError> {
        self.enter("find_shipping_address").await?;
        Ok(self.shipping_of(order_id))
    }

    async fn delete_by_order(&self, order_id: i32) -> Result<bool, RepositoryError> {
        self.enter("delete_shipping_address").await?;
        let mut db = self.db();
        let before = db.shipping.len();
        db.shipping.retain(|_, s| s.order_id != order_id);
        Ok(db.shipping.len() < before)
    }
}

#[async_trait]
impl LifecycleIntentRepositoryTrait for MemoryStore {
    async fn record_intent(
        &self,
        order_id: i32,
        action: LifecycleAction,
        lease: Duration,
    ) -> Result<LifecycleIntent, RepositoryError> {
        self.enter("record_intent").await?;
        let mut db = self.db();
        let intent_id = db.next_id();
        let intent = LifecycleIntent {
            intent_id,
            order_id,
            action,
            created_at: now(),
            leased_until: lease_from_now(lease),
            completed_at: None,
        };
        db.intents.insert(intent_id, intent.clone());
        Ok(intent)
    }

    async fn complete_intent(&self, intent_id: i32) -> Result<(), RepositoryError> {
        self.enter("complete_intent").await?;
        let mut db = self.db();
        let intent = db
            .intents
            .get_mut(&intent_id)
            .ok_or(RepositoryError::NotFound)?;
        if intent.completed_at.is_none() {
            intent.completed_at = now();
        }
        Ok(())
    }

    async fn release_intent(&self, intent_id: i32) -> Result<(), RepositoryError> {
        self.enter("release_intent").await?;
        if let Some(intent) = self
            .db()
            .intents
            .get_mut(&intent_id)
            .filter(|i| i.completed_at.is_none())
        {
            intent.leased_until = None;
        }
        Ok(())
    }

    async fn claim_pending(&self, lease: Duration) -> Result<Vec<LifecycleIntent>, RepositoryError> {
        self.enter("claim_pending").await?;
        let current = now();
        let mut db = self.db();
        let claimed = db
            .intents
            .values_mut()
            .filter(|i| i.completed_at.is_none())
            .filter(|i| i.leased_until.is_none() || i.leased_until < current)
            .map(|intent| {
                intent.leased_until = lease_from_now(lease);
                intent.clone()
            })
            .collect();
        Ok(claimed)
    }
}

#[derive(Default)]
pub struct RecordingMetrics {
    records: Mutex<Vec<(Method, Status)>>,
}

impl RecordingMetrics {
    pub fn records(&self) -> Vec<(Method, Status)> {
        self.records.lock().expect("metrics lock").clone()
    }
}

impl MetricsSink for RecordingMetrics {
    fn record(&self, method: Method, status: Status, _duration_secs: f64) {
        self.records
            .lock()
            .expect("metrics lock")
            .push((method, status));
    }
}

pub struct Harness {
    pub store: MemoryStore,
    pub service: OrderCommandService,
    pub query: OrderQueryService,
    pub metrics: Arc<RecordingMetrics>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(OrderCommandConfig::default())
    }

    pub fn with_config(config: OrderCommandConfig) -> Self {
        let store = MemoryStore::default();
        let metrics = Arc::new(RecordingMetrics::default());
        let shared = Arc::new(store.clone());

        let service = OrderCommandService::new(OrderCommandServiceDeps {
            merchants: shared.clone(),
            users: shared.clone(),
            products: shared.clone(),
            command: shared.clone(),
            query: shared.clone(),
            order_item_command: shared.clone(),
            order_item_query: shared.clone(),
            shipping: shared.clone(),
            intents: shared.clone(),
            metrics: metrics.clone(),
            config,
        });

        let query = OrderQueryService::new(shared, metrics.clone());

        Self {
            store,
            service,
            query,
            metrics,
        }
    }

    /// Merchant 7, user 3 and product 10 priced 500 with the given stock.
    pub fn seeded(stock: i32) -> Self {
        let harness = Self::new();
        harness.seed_defaults(stock);
        harness
    }

    pub fn seed_defaults(&self, stock: i32) {
        self.store.seed_merchant(7);
        self.store.seed_user(3);
        self.store.seed_product(10, 500, stock);
    }
}

pub fn shipping_details() -> CreateShippingAddressRequest {
    CreateShippingAddressRequest {
        address: "Jl. Merdeka 1".into(),
        province: "DKI Jakarta".into(),
        city: "Jakarta".into(),
        country: "Indonesia".into(),
        courier: "JNE".into(),
        shipping_method: "REG".into(),
        shipping_cost: 15000,
    }
}

pub fn create_request(items: &[(i32, i32)]) -> CreateOrderRequest {
    CreateOrderRequest {
        merchant_id: 7,
        user_id: 3,
        items: items
            .iter()
            .map(|&(product_id, quantity)| CreateOrderItemRequest {
                product_id,
                quantity,
            })
            .collect(),
        shipping: shipping_details(),
    }
}
