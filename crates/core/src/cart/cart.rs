//! The in-memory cart.

use rust_decimal::Decimal;

use super::buyable::{Buyable, BuyableKind, RowId};
use super::error::CartError;
use super::item::CartItem;
use super::stored::{STORED_CART_VERSION, StoredCart};
use crate::BuyableId;

/// A keyed collection of cart rows, at most one per `(kind, id)`.
///
/// Rows keep insertion order, so [`Cart::content`] and [`Cart::kind`] are
/// deterministic for a given history of operations.
#[derive(Debug, Clone)]
pub struct Cart<B> {
    items: Vec<CartItem<B>>,
}

impl<B> Default for Cart<B> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<B: Buyable> Cart<B> {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from its session record.
    ///
    /// `resolve` is called once per stored row and returns the loaded entity,
    /// or `None` if it no longer exists. Rows that cannot be resolved, rows
    /// with a zero quantity and repeated rows are dropped. Records with an
    /// unsupported schema version yield an empty cart.
    pub fn from_stored<F>(stored: StoredCart, mut resolve: F) -> Self
    where
        F: FnMut(BuyableKind, BuyableId) -> Option<B>,
    {
        let mut cart = Self::new();
        if !stored.is_supported() {
            return cart;
        }

        for record in stored.items {
            if record.quantity == 0 {
                continue;
            }
            let row_id = RowId::new(record.kind, record.id);
            if cart.position(&row_id).is_some() {
                continue;
            }
            if let Some(buyable) = resolve(record.kind, record.id) {
                cart.items.push(CartItem::new(buyable, record.quantity));
            }
        }

        cart
    }

    /// Add `quantity` units of `buyable`.
    ///
    /// Grows the existing row if the buyable is already in the cart,
    /// otherwise appends a new row. The quantity saturates at `u32::MAX`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `quantity` is zero.
    pub fn add(&mut self, buyable: B, quantity: u32) -> Result<&CartItem<B>, CartError> {
        ensure_positive(quantity)?;
        let index = match self.position(&buyable.row_id()) {
            Some(index) => {
                let item = self.item_mut(index);
                item.set_quantity(item.quantity().saturating_add(quantity));
                index
            }
            None => self.push(CartItem::new(buyable, quantity)),
        };
        Ok(self.item(index))
    }

    /// Set the quantity of `buyable` to exactly `quantity`.
    ///
    /// Overwrites the existing row's quantity, or appends a new row.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `quantity` is zero.
    pub fn set(&mut self, buyable: B, quantity: u32) -> Result<&CartItem<B>, CartError> {
        ensure_positive(quantity)?;
        let index = match self.position(&buyable.row_id()) {
            Some(index) => {
                self.item_mut(index).set_quantity(quantity);
                index
            }
            None => self.push(CartItem::new(buyable, quantity)),
        };
        Ok(self.item(index))
    }

    /// Remove the row for `buyable`, returning it if it was present.
    pub fn remove(&mut self, buyable: &impl Buyable) -> Option<CartItem<B>> {
        self.remove_row(&buyable.row_id())
    }

    /// Remove a row by its id, returning it if it was present.
    pub fn remove_row(&mut self, row_id: &RowId) -> Option<CartItem<B>> {
        self.position(row_id).map(|index| self.items.remove(index))
    }

    /// Look up the row for `buyable`.
    #[must_use]
    pub fn get(&self, buyable: &impl Buyable) -> Option<&CartItem<B>> {
        self.get_row(&buyable.row_id())
    }

    /// Look up a row by its id.
    #[must_use]
    pub fn get_row(&self, row_id: &RowId) -> Option<&CartItem<B>> {
        self.items.iter().find(|item| item.row_id() == row_id)
    }

    /// Remove every row.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Whether the cart has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Rows in insertion order.
    #[must_use]
    pub fn content(&self) -> &[CartItem<B>] {
        &self.items
    }

    /// Total number of units across all rows.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    /// Sum of every row's line total at current prices.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::total).sum()
    }

    /// Kind of the first row.
    ///
    /// Carts are expected to hold a single kind; for mixed carts this is the
    /// kind of the oldest surviving row. See [`Cart::kinds`].
    ///
    /// # Errors
    ///
    /// Returns `CartError::EmptyCart` if the cart has no rows.
    pub fn kind(&self) -> Result<BuyableKind, CartError> {
        self.items
            .first()
            .map(CartItem::kind)
            .ok_or(CartError::EmptyCart)
    }

    /// Uppercase type code of the first row (e.g. `PRODUCT`).
    ///
    /// # Errors
    ///
    /// Returns `CartError::EmptyCart` if the cart has no rows.
    pub fn type_code(&self) -> Result<&'static str, CartError> {
        self.kind().map(BuyableKind::type_code)
    }

    /// Distinct kinds present, in order of first appearance.
    #[must_use]
    pub fn kinds(&self) -> Vec<BuyableKind> {
        let mut kinds = Vec::new();
        for item in &self.items {
            let kind = item.kind();
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        kinds
    }

    /// Serialize every row into a session record.
    #[must_use]
    pub fn to_stored(&self) -> StoredCart {
        StoredCart {
            version: STORED_CART_VERSION,
            items: self.items.iter().map(CartItem::to_stored).collect(),
        }
    }

    fn position(&self, row_id: &RowId) -> Option<usize> {
        self.items.iter().position(|item| item.row_id() == row_id)
    }

    fn push(&mut self, item: CartItem<B>) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    #[allow(clippy::indexing_slicing)] // index comes from `position` or `push`
    fn item(&self, index: usize) -> &CartItem<B> {
        &self.items[index]
    }

    #[allow(clippy::indexing_slicing)] // index comes from `position`
    fn item_mut(&mut self, index: usize) -> &mut CartItem<B> {
        &mut self.items[index]
    }
}

const fn ensure_positive(quantity: u32) -> Result<(), CartError> {
    if quantity == 0 {
        return Err(CartError::InvalidQuantity(quantity));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use super::*;

    /// Test buyable whose price can be changed after it is put in a cart.
    #[derive(Debug, Clone)]
    struct Widget {
        kind: BuyableKind,
        id: BuyableId,
        price: Rc<Cell<Decimal>>,
    }

    impl Widget {
        fn new(kind: BuyableKind, id: i32, cents: i64) -> Self {
            Self {
                kind,
                id: BuyableId::new(id),
                price: Rc::new(Cell::new(Decimal::new(cents, 2))),
            }
        }

        fn product(id: i32, cents: i64) -> Self {
            Self::new(BuyableKind::Product, id, cents)
        }
    }

    impl Buyable for Widget {
        fn kind(&self) -> BuyableKind {
            self.kind
        }

        fn id(&self) -> BuyableId {
            self.id
        }

        fn price(&self) -> Decimal {
            self.price.get()
        }
    }

    fn quantity_of(cart: &Cart<Widget>, widget: &Widget) -> Option<u32> {
        cart.get(widget).map(CartItem::quantity)
    }

    #[test]
    fn test_add_merges_same_buyable() {
        let a = Widget::product(1, 1000);
        let b = Widget::product(2, 250);
        let mut cart = Cart::new();

        cart.add(a.clone(), 2).unwrap();
        cart.add(b.clone(), 1).unwrap();
        cart.add(a.clone(), 3).unwrap();

        assert_eq!(cart.len(), 2);
        assert_eq!(quantity_of(&cart, &a), Some(5));
        assert_eq!(quantity_of(&cart, &b), Some(1));
        assert_eq!(cart.count(), 6);
    }

    #[test]
    fn test_add_is_additive() {
        let a = Widget::product(1, 100);

        let mut split = Cart::new();
        split.add(a.clone(), 2).unwrap();
        split.add(a.clone(), 5).unwrap();

        let mut single = Cart::new();
        single.add(a.clone(), 7).unwrap();

        assert_eq!(split.to_stored(), single.to_stored());
    }

    #[test]
    fn test_add_saturates() {
        let a = Widget::product(1, 100);
        let mut cart = Cart::new();
        cart.add(a.clone(), u32::MAX).unwrap();
        let item = cart.add(a, 1).unwrap();
        assert_eq!(item.quantity(), u32::MAX);
    }

    #[test]
    fn test_same_id_different_kind_are_separate_rows() {
        let product = Widget::new(BuyableKind::Product, 1, 100);
        let service = Widget::new(BuyableKind::Service, 1, 100);
        let mut cart = Cart::new();

        cart.add(product, 1).unwrap();
        cart.add(service, 1).unwrap();

        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_set_overwrites_quantity() {
        let a = Widget::product(1, 100);
        let mut cart = Cart::new();

        cart.add(a.clone(), 4).unwrap();
        let item = cart.set(a.clone(), 2).unwrap();
        assert_eq!(item.quantity(), 2);

        cart.set(a.clone(), 9).unwrap();
        assert_eq!(quantity_of(&cart, &a), Some(9));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_set_creates_missing_row() {
        let a = Widget::product(1, 100);
        let mut cart = Cart::new();
        cart.set(a.clone(), 3).unwrap();
        assert_eq!(quantity_of(&cart, &a), Some(3));
    }

    #[test]
    fn test_zero_quantity_is_rejected_without_mutation() {
        let a = Widget::product(1, 100);
        let mut cart = Cart::new();
        cart.add(a.clone(), 2).unwrap();

        assert_eq!(
            cart.add(a.clone(), 0).unwrap_err(),
            CartError::InvalidQuantity(0)
        );
        assert_eq!(
            cart.set(a.clone(), 0).unwrap_err(),
            CartError::InvalidQuantity(0)
        );
        assert!(cart.set(Widget::product(2, 1), 0).is_err());

        assert_eq!(quantity_of(&cart, &a), Some(2));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_remove_then_get_is_none() {
        let a = Widget::product(1, 100);
        let mut cart = Cart::new();
        cart.add(a.clone(), 1).unwrap();

        let removed = cart.remove(&a).unwrap();
        assert_eq!(removed.quantity(), 1);
        assert!(cart.get(&a).is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart: Cart<Widget> = Cart::new();
        assert!(cart.remove(&Widget::product(1, 100)).is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(Widget::product(1, 100), 1).unwrap();
        cart.add(Widget::product(2, 100), 1).unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.count(), 0);
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_content_keeps_insertion_order() {
        let mut cart = Cart::new();
        cart.add(Widget::product(3, 100), 1).unwrap();
        cart.add(Widget::product(1, 100), 1).unwrap();
        cart.add(Widget::product(2, 100), 1).unwrap();
        cart.add(Widget::product(3, 100), 1).unwrap();

        let rows: Vec<&str> = cart.content().iter().map(|i| i.row_id().as_str()).collect();
        assert_eq!(rows, ["product-3", "product-1", "product-2"]);
    }

    #[test]
    fn test_total_uses_live_prices() {
        let a = Widget::product(1, 1000);
        let b = Widget::product(2, 250);
        let mut cart = Cart::new();
        cart.add(a.clone(), 2).unwrap();
        cart.add(b.clone(), 3).unwrap();

        assert_eq!(cart.total(), Decimal::new(2750, 2));

        a.price.set(Decimal::new(1200, 2));
        assert_eq!(cart.total(), Decimal::new(3150, 2));
        assert_eq!(cart.get(&a).unwrap().unit_price(), Decimal::new(1200, 2));
    }

    #[test]
    fn test_kind_of_empty_cart_is_error() {
        let cart: Cart<Widget> = Cart::new();
        assert_eq!(cart.kind().unwrap_err(), CartError::EmptyCart);
        assert_eq!(cart.type_code().unwrap_err(), CartError::EmptyCart);
    }

    #[test]
    fn test_type_code_uses_first_row() {
        let mut cart = Cart::new();
        cart.add(Widget::new(BuyableKind::Subscription, 1, 100), 1)
            .unwrap();
        cart.add(Widget::product(1, 100), 1).unwrap();

        assert_eq!(cart.type_code().unwrap(), "SUBSCRIPTION");
        assert_eq!(
            cart.kinds(),
            vec![BuyableKind::Subscription, BuyableKind::Product]
        );
    }

    #[test]
    fn test_stored_round_trip() {
        let a = Widget::product(1, 100);
        let s = Widget::new(BuyableKind::Service, 5, 900);
        let mut cart = Cart::new();
        cart.add(a.clone(), 2).unwrap();
        cart.add(s.clone(), 1).unwrap();

        let catalog: HashMap<(BuyableKind, BuyableId), Widget> = [a, s]
            .into_iter()
            .map(|w| ((w.kind, w.id), w))
            .collect();

        let restored = Cart::from_stored(cart.to_stored(), |kind, id| {
            catalog.get(&(kind, id)).cloned()
        });

        assert_eq!(restored.to_stored(), cart.to_stored());
    }

    #[test]
    fn test_from_stored_drops_missing_entities() {
        let a = Widget::product(1, 100);
        let gone = Widget::product(2, 100);
        let mut cart = Cart::new();
        cart.add(a.clone(), 1).unwrap();
        cart.add(gone, 4).unwrap();

        let restored = Cart::from_stored(cart.to_stored(), |_, id| {
            (id == a.id).then(|| a.clone())
        });

        assert_eq!(restored.len(), 1);
        assert_eq!(restored.count(), 1);
    }

    #[test]
    fn test_from_stored_skips_zero_and_duplicate_rows() {
        let a = Widget::product(1, 100);
        let b = Widget::product(2, 100);
        let mut stored = StoredCart::default();
        stored.items.push(CartItem::new(a.clone(), 2).to_stored());
        stored.items.push(CartItem::new(a.clone(), 7).to_stored());
        stored.items.push(CartItem::new(b.clone(), 0).to_stored());

        let restored = Cart::from_stored(stored, |_, id| {
            [&a, &b].into_iter().find(|w| w.id == id).cloned()
        });

        assert_eq!(restored.len(), 1);
        assert_eq!(quantity_of(&restored, &a), Some(2));
    }

    #[test]
    fn test_from_stored_ignores_unsupported_version() {
        let a = Widget::product(1, 100);
        let mut stored = StoredCart::default();
        stored.items.push(CartItem::new(a.clone(), 1).to_stored());
        stored.version = STORED_CART_VERSION + 1;

        let restored = Cart::from_stored(stored, |_, _| Some(a.clone()));
        assert!(restored.is_empty());
    }

    #[test]
    fn test_never_two_rows_for_same_buyable() {
        let widgets: Vec<Widget> = (1..=3).map(|id| Widget::product(id, 100)).collect();
        let mut cart = Cart::new();

        for step in 0..30_u32 {
            let widget = widgets[(step as usize) % widgets.len()].clone();
            match step % 4 {
                0 | 1 => {
                    cart.add(widget, step + 1).unwrap();
                }
                2 => {
                    cart.set(widget, 2).unwrap();
                }
                _ => {
                    cart.remove(&widget);
                }
            }

            let mut rows: Vec<&RowId> = cart.content().iter().map(CartItem::row_id).collect();
            let before = rows.len();
            rows.sort();
            rows.dedup();
            assert_eq!(rows.len(), before);
            let sum: u64 = cart.content().iter().map(|i| u64::from(i.quantity())).sum();
            assert_eq!(cart.count(), sum);
        }
    }
}
