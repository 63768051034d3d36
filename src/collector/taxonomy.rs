use crate::config::{CategoryFilter, FilterSpec};
use crate::model::{ResolvedSelection, SubcategoryRef};
use crate::parser::{RawCategoryNode, RawSubcategoryNode};
use crate::scraper::UpstreamClient;
use tracing::{debug, info, warn};

/// Fetches the branch taxonomy once and reduces it to the categories to collect.
///
/// Any upstream failure, including a raised error flag, yields an empty list.
pub async fn resolve(upstream: &dyn UpstreamClient, filter: FilterSpec<'_>) -> Vec<ResolvedSelection> {
    match upstream.fetch_taxonomy().await {
        Ok(categories) => {
            info!("Taxonomy fetched: {} categories", categories.len());
            select_categories(&categories, filter)
        }
        Err(e) => {
            warn!("Error obteniendo categorías y subcategorías: {}", e);
            Vec::new()
        }
    }
}

/// Applies a filter mode to an already flattened taxonomy, keeping upstream order.
pub fn select_categories(categories: &[RawCategoryNode], filter: FilterSpec<'_>) -> Vec<ResolvedSelection> {
    match filter {
        FilterSpec::CategoryWithSubcategories(filters) => categories
            .iter()
            .filter_map(|category| {
                let wanted = filters.iter().find(|f| f.category == category.name)?;
                select_subcategories(category, wanted)
            })
            .collect(),
        FilterSpec::CategoryOnly(names) => categories
            .iter()
            .filter(|category| names.contains(&category.name))
            .map(whole_category)
            .collect(),
        FilterSpec::Unfiltered => categories.iter().map(whole_category).collect(),
    }
}

fn select_subcategories(category: &RawCategoryNode, wanted: &CategoryFilter) -> Option<ResolvedSelection> {
    if wanted.subcategories.is_empty() {
        return Some(whole_category(category));
    }

    let subcategories: Vec<SubcategoryRef> = category
        .subcategories
        .iter()
        .filter(|sub| wanted.subcategories.contains(&sub.name))
        .map(subcategory_ref)
        .collect();

    if subcategories.is_empty() {
        debug!(
            "No configured subcategory matched in '{}', skipping category",
            category.name
        );
        return None;
    }

    Some(ResolvedSelection {
        category_id: category.id,
        category_name: category.name.clone(),
        all_subcategories: false,
        subcategories,
    })
}

fn whole_category(category: &RawCategoryNode) -> ResolvedSelection {
    ResolvedSelection {
        category_id: category.id,
        category_name: category.name.clone(),
        all_subcategories: true,
        subcategories: category.subcategories.iter().map(subcategory_ref).collect(),
    }
}

fn subcategory_ref(sub: &RawSubcategoryNode) -> SubcategoryRef {
    SubcategoryRef {
        sub_category_id: sub.id,
        name: sub.name.clone(),
    }
}
