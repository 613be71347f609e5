// Data structures shared across the application
// e.g., Listing, NewListing, User

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fuel type of a listed vehicle. The wire strings match the values the
/// listings table stores and the browse filters offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Engine {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
}

impl Engine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Petrol => "Petrol",
            Engine::Diesel => "Diesel",
            Engine::Electric => "Electric",
            Engine::Hybrid => "Hybrid",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Petrol" => Ok(Engine::Petrol),
            "Diesel" => Ok(Engine::Diesel),
            "Electric" => Ok(Engine::Electric),
            "Hybrid" => Ok(Engine::Hybrid),
            other => Err(format!("unknown engine type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transmission {
    Automatic,
    Manual,
    #[serde(rename = "Semi-Automatic")]
    SemiAutomatic,
}

impl Transmission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transmission::Automatic => "Automatic",
            Transmission::Manual => "Manual",
            Transmission::SemiAutomatic => "Semi-Automatic",
        }
    }
}

impl fmt::Display for Transmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transmission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Automatic" => Ok(Transmission::Automatic),
            "Manual" => Ok(Transmission::Manual),
            "Semi-Automatic" => Ok(Transmission::SemiAutomatic),
            other => Err(format!("unknown transmission '{}'", other)),
        }
    }
}

/// A vehicle-for-sale record as stored in the remote listings table.
/// Immutable once fetched; updates replace the record wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")] // Matches the remote column names (engineSize)
pub struct Listing {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub engine: Engine,
    pub engine_size: f64,
    pub mileage: u32,
    pub transmission: Transmission,
    pub color: String,
    pub year: u32,
    pub description: String,
    /// Public image URLs, in the order the files were uploaded.
    pub images: Vec<String>,
    pub location: String,
}

/// A listing ready for insertion. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub name: String,
    pub price: f64,
    pub engine: Engine,
    pub engine_size: f64,
    pub mileage: u32,
    pub transmission: Transmission,
    pub color: String,
    pub year: u32,
    pub description: String,
    pub images: Vec<String>,
    pub location: String,
}

/// A marketplace account row. Accounts are created by the auth provider;
/// this application only reads and deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Struct to capture the access token submitted from the login form
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    // Field name must match the 'name' attribute in the HTML form input
    #[serde(rename = "accessToken")]
    pub access_token: String,
}
