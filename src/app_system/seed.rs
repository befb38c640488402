//! Default catalog loaded at startup when `SEED_CATALOG=true`.

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::clients::ProductClient;
use crate::domain::{Category, ProductCreate};
use crate::product_actor::ProductError;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn default_catalog() -> Vec<ProductCreate> {
    vec![
        ProductCreate {
            slug: "dried-xilikha-100g".into(),
            name: "Pure Dried Xilikha".into(),
            subtitle: "Traditional Haritaki".into(),
            price: Decimal::from(150),
            weight: "100g".into(),
            category: Category::Dried,
            image: "/assets/dried-xilikha.png".into(),
            description: "Premium quality dried Xilikha (Haritaki) sourced directly from the lush forests \
                of Assam. Naturally sun-dried to preserve its authentic flavor and medicinal properties."
                .into(),
            benefits: strings(&[
                "Rich in antioxidants and vitamin C",
                "Supports digestive health",
                "Traditional Ayurvedic superfood",
                "No artificial preservatives",
                "Sustainably sourced from Assam",
            ]),
            uses: strings(&[
                "Traditional Assamese dishes (khar, tenga)",
                "Ayurvedic preparations",
                "Herbal remedies",
                "Digestive tonic",
            ]),
            ingredients: Vec::new(),
            featured: true,
            stock_quantity: 50,
        },
        ProductCreate {
            slug: "xilikha-tea-blend-50g".into(),
            name: "Xilikha Wellness Tea".into(),
            subtitle: "Herbal Tea Blend".into(),
            price: Decimal::from(250),
            weight: "50g".into(),
            category: Category::Tea,
            image: "/assets/tea-blend.png".into(),
            description: "A unique wellness tea blend featuring premium Xilikha combined with traditional \
                Assamese herbs. Perfect for daily wellness routine."
                .into(),
            benefits: strings(&[
                "Boosts immunity",
                "Aids digestion",
                "Rich in antioxidants",
                "Calming and soothing",
                "100% natural ingredients",
            ]),
            uses: strings(&["Morning wellness drink", "After meals", "Evening relaxation"]),
            ingredients: strings(&["Xilikha", "Assam tea leaves", "Ginger", "Tulsi"]),
            featured: true,
            stock_quantity: 30,
        },
        ProductCreate {
            slug: "salted-xilikha-200g".into(),
            name: "Salted Xilikha".into(),
            subtitle: "Traditional Pickle".into(),
            price: Decimal::from(180),
            weight: "200g".into(),
            category: Category::Salted,
            image: "/assets/salted-xilikha.png".into(),
            description: "Traditional Assamese salted Xilikha preparation. A tangy and flavorful condiment \
                that adds authentic taste to your meals."
                .into(),
            benefits: strings(&[
                "Traditional Assamese recipe",
                "Long shelf life",
                "No artificial colors",
                "Handmade with care",
                "Unique flavor enhancer",
            ]),
            uses: strings(&["Side dish with rice", "Flavor enhancer in curries", "Traditional accompaniment"]),
            ingredients: Vec::new(),
            featured: true,
            stock_quantity: 40,
        },
    ]
}

/// Creates every catalog entry whose slug is not already present.
/// Returns how many products were added.
pub async fn seed_catalog(products: &ProductClient) -> Result<usize, ProductError> {
    let mut added = 0;
    for entry in default_catalog() {
        match products.resolve(entry.slug.clone()).await {
            Ok(_) => debug!(slug = %entry.slug, "Catalog entry already present"),
            Err(ProductError::NotFound(_)) => {
                products.create_product(entry).await?;
                added += 1;
            }
            Err(e) => return Err(e),
        }
    }
    info!(added, "Catalog seeded");
    Ok(added)
}
