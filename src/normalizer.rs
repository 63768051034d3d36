use crate::model::{NormalizeError, PriceRecord};
use crate::parser::RawProduct;
use chrono::{DateTime, Utc};

/// Category context a product was listed under.
#[derive(Debug, Clone)]
pub struct PriceContext<'a> {
    pub category_id: i64,
    pub category_name: &'a str,
    pub sub_category_id: Option<i64>,
    pub recorded_at: DateTime<Utc>,
}

/// Maps one upstream product into a canonical price record.
///
/// With an offer running, `PrecioOferta` feeds `original_price` and
/// `PrecioOriginal` feeds `price`. Keep this crossed mapping until the upstream
/// field naming is reconfirmed against live data.
pub fn normalize(product: &RawProduct, ctx: &PriceContext<'_>) -> Result<PriceRecord, NormalizeError> {
    let product_id = product
        .product_id()
        .ok_or(NormalizeError::MissingField("IdProducto"))?;
    let description = product
        .description
        .clone()
        .ok_or(NormalizeError::MissingField("Descripcion"))?;
    let on_offer = product
        .on_offer
        .ok_or(NormalizeError::MissingField("ConOferta"))?;
    let currency = product
        .currency
        .clone()
        .ok_or(NormalizeError::MissingField("Moneda"))?;

    let (original_price, price) = if on_offer {
        (product.offer_price, product.original_price)
    } else {
        (product.sale_price, None)
    };

    Ok(PriceRecord {
        product_id,
        description,
        on_offer,
        price,
        original_price,
        currency,
        category_id: ctx.category_id,
        category_name: ctx.category_name.to_string(),
        sub_category_id: ctx.sub_category_id.unwrap_or(0),
        recorded_at: ctx.recorded_at,
    })
}
