use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

use super::types::{CartItem, CategoryPreference, UserProfile};
use crate::domain::product::ProductSummary;
use crate::errors::ApplicationError;

pub const SEASONAL_PRODUCT_LIMIT: usize = 3;

const PERSONALIZED: &str = "personalized_email.txt";
const RECOMMENDATION: &str = "recommendation_email.txt";
const ABANDONED_CART: &str = "abandoned_cart_email.txt";
const SEASONAL: &str = "seasonal_email.txt";
const GENERIC: &str = "generic_email.txt";

/// Base copy per email type.
pub fn default_email_templates() -> BTreeMap<String, String> {
    [
        ("welcome", "Welcome to our store! We noticed you recently purchased {product}."),
        (
            "recommendation",
            "Based on your purchase of {product}, you might like {recommended_product}.",
        ),
        ("discount", "Special {discount}% discount on {category} for you!"),
        ("abandoned_cart", "Don't forget about the items in your cart: {items}"),
    ]
    .into_iter()
    .map(|(kind, template)| (kind.to_owned(), template.to_owned()))
    .collect()
}

/// Doubles single and double quotes so base copy can be embedded verbatim.
pub fn escape_quotes(template: &str) -> String {
    template.replace('\'', "''").replace('"', "\"\"")
}

fn register_prompt_filters(tera: &mut Tera) {
    tera.register_filter("money", money_filter);
    tera.register_filter("fixed", fixed_filter);
}

fn number(value: &tera::Value, filter: &str) -> tera::Result<f64> {
    match value {
        tera::Value::Number(number) => Ok(number.as_f64().unwrap_or(0.0)),
        tera::Value::Null => Ok(0.0),
        _ => Err(tera::Error::msg(format!("{filter} filter expects a number"))),
    }
}

/// `price | money` renders two decimals.
fn money_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    Ok(tera::Value::String(format!("{:.2}", number(value, "money")?)))
}

/// `rating | fixed(digits=1)`.
fn fixed_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let digits = args.get("digits").and_then(tera::Value::as_u64).unwrap_or(2) as usize;
    Ok(tera::Value::String(format!("{:.*}", digits, number(value, "fixed")?)))
}

#[derive(Debug, Serialize)]
struct ProductLine<'a> {
    name: &'a str,
    price: f64,
    rating: f64,
}

impl<'a> From<&'a ProductSummary> for ProductLine<'a> {
    fn from(product: &'a ProductSummary) -> Self {
        Self { name: &product.name, price: product.price, rating: product.rating }
    }
}

/// Renders marketing prompts for the text-generation collaborator.
#[derive(Debug)]
pub struct PromptBuilder {
    tera: Tera,
    email_templates: BTreeMap<String, String>,
}

impl PromptBuilder {
    pub fn new(email_templates: BTreeMap<String, String>) -> Result<Self, ApplicationError> {
        let mut tera = Tera::default();
        register_prompt_filters(&mut tera);
        tera.add_raw_templates(vec![
            (PERSONALIZED, include_str!("../../templates/personalized_email.txt")),
            (RECOMMENDATION, include_str!("../../templates/recommendation_email.txt")),
            (ABANDONED_CART, include_str!("../../templates/abandoned_cart_email.txt")),
            (SEASONAL, include_str!("../../templates/seasonal_email.txt")),
            (GENERIC, include_str!("../../templates/generic_email.txt")),
        ])
        .map_err(|error| ApplicationError::Template(error.to_string()))?;

        Ok(Self { tera, email_templates })
    }

    pub fn with_default_templates() -> Result<Self, ApplicationError> {
        Self::new(default_email_templates())
    }

    pub fn template_names(&self) -> Vec<&str> {
        self.tera.get_template_names().collect()
    }

    /// Escaped base copy for `email_type`; unknown types yield an empty string.
    pub fn base_template(&self, email_type: &str) -> String {
        self.email_templates.get(email_type).map(|template| escape_quotes(template)).unwrap_or_default()
    }

    pub fn personalized_email(
        &self,
        profile: &UserProfile,
        email_type: &str,
    ) -> Result<String, ApplicationError> {
        let mut context = Context::new();
        context.insert("name", &profile.display_name());
        context.insert("total_orders", &profile.total_orders);
        context.insert("avg_order_value", &profile.avg_order_value);
        context.insert(
            "last_order",
            &profile
                .last_order_date
                .map(|date| date.to_string())
                .unwrap_or_else(|| "Never".to_owned()),
        );
        context.insert("email_type", email_type);
        context.insert("base_template", &self.base_template(email_type));
        self.render(PERSONALIZED, &context)
    }

    pub fn recommendation_email(
        &self,
        preferences: &[CategoryPreference],
        products: &[ProductSummary],
    ) -> Result<String, ApplicationError> {
        let mut context = Context::new();
        context.insert("preferences", preferences);
        context.insert("products", &product_lines(products));
        self.render(RECOMMENDATION, &context)
    }

    pub fn abandoned_cart_email(&self, items: &[CartItem]) -> Result<String, ApplicationError> {
        let mut context = Context::new();
        context.insert("items", items);
        self.render(ABANDONED_CART, &context)
    }

    /// Only the first few products are featured.
    pub fn seasonal_email(
        &self,
        season: &str,
        products: &[ProductSummary],
    ) -> Result<String, ApplicationError> {
        let featured = &products[..products.len().min(SEASONAL_PRODUCT_LIMIT)];
        let mut context = Context::new();
        context.insert("season", season);
        context.insert("products", &product_lines(featured));
        self.render(SEASONAL, &context)
    }

    pub fn generic_email(&self, email_type: &str) -> Result<String, ApplicationError> {
        let mut context = Context::new();
        context.insert("base_template", &self.base_template(email_type));
        self.render(GENERIC, &context)
    }

    fn render(&self, template: &str, context: &Context) -> Result<String, ApplicationError> {
        let rendered = self
            .tera
            .render(template, context)
            .map_err(|error| ApplicationError::Template(format!("{template}: {error}")))?;
        debug!(event_name = "prompts.rendered", template, len = rendered.len(), "prompt rendered");
        Ok(rendered)
    }
}

fn product_lines(products: &[ProductSummary]) -> Vec<ProductLine<'_>> {
    products.iter().map(ProductLine::from).collect()
}
