use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

id_newtype!(ProductId);

/// A listable catalog item.
///
/// The backend speaks the `nombre`/`descripcion`/`precio`/`categoria`/`imagen`
/// field names; the English names are accepted on input as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(rename = "nombre", alias = "name")]
    pub name: String,
    #[serde(rename = "descripcion", alias = "description", default)]
    pub description: String,
    #[serde(rename = "precio", alias = "price")]
    pub price: f64,
    #[serde(rename = "categoria", alias = "category", default)]
    pub category: String,
    #[serde(rename = "imagen", alias = "image", default)]
    pub image: String,
}

impl Product {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        category: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: ProductId(id),
            name: name.into(),
            description: description.into(),
            price,
            category: category.into(),
            image: image.into(),
        }
    }
}
