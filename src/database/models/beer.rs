use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Beer {
    pub id: Uuid,
    pub name: String,
    pub style: Option<String>,
    pub abv: Option<f64>,
    pub categories: Vec<String>,
    pub malts: Vec<String>,
    pub hops: Vec<String>,
    pub flavor_notes: Vec<String>,
}

/// Validated beer fields; the id is assigned on insert.
#[derive(Debug, Clone)]
pub struct NewBeer {
    pub name: String,
    pub style: Option<String>,
    pub abv: Option<f64>,
    pub categories: Vec<String>,
    pub malts: Vec<String>,
    pub hops: Vec<String>,
    pub flavor_notes: Vec<String>,
}

impl NewBeer {
    pub fn into_beer(self, id: Uuid) -> Beer {
        Beer {
            id,
            name: self.name,
            style: self.style,
            abv: self.abv,
            categories: self.categories,
            malts: self.malts,
            hops: self.hops,
            flavor_notes: self.flavor_notes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Brewery {
    pub id: Uuid,
    pub company_name: String,
    pub owner: Option<String>,
    pub admins: Vec<Uuid>,
    pub staff: Vec<Uuid>,
    pub beers: Vec<Uuid>,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewBrewery {
    pub company_name: String,
    pub owner: Option<String>,
    pub admins: Vec<Uuid>,
    pub staff: Vec<Uuid>,
    pub beers: Vec<Uuid>,
    pub categories: Vec<String>,
}

impl NewBrewery {
    pub fn into_brewery(self, id: Uuid) -> Brewery {
        Brewery {
            id,
            company_name: self.company_name,
            owner: self.owner,
            admins: self.admins,
            staff: self.staff,
            beers: dedup_ids(self.beers),
            categories: self.categories,
        }
    }
}

/// Keep the first occurrence of each id.
pub(crate) fn dedup_ids(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut out: Vec<Uuid> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}
