use serde::{Deserialize, Deserializer, Serialize};

pub type BookId = i64;

/// The server's columns are nullable, so a `null` decodes to the empty value.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id:         Option<BookId>,
    #[serde(rename = "nome", default, deserialize_with = "null_as_default")]
    pub title:      String,
    #[serde(rename = "genero", default, deserialize_with = "null_as_default")]
    pub genre:      String,
    #[serde(rename = "paginas", default, deserialize_with = "null_as_default")]
    pub page_count: i64,
    /// Empty means the book has no cover.
    #[serde(rename = "foto", default, deserialize_with = "null_as_default")]
    pub cover_url:  String,
}

impl BookEntry {
    pub fn cover(&self) -> Option<&str> {
        let cover = self.cover_url.trim();
        if cover.is_empty() {
            None
        } else {
            Some(cover)
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
