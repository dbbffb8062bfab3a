use super::endpoints::Region;
use serde::Deserialize;

// Summoner V3 response
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SummonerDto {
    pub id: u64,
    pub account_id: u64,
    pub name: String,
    #[serde(default)]
    pub profile_icon_id: i32,
    pub summoner_level: i32,
    #[serde(default)]
    pub revision_date: i64,
}

/// A player as seen on one platform.
#[derive(Debug, Clone, PartialEq)]
pub struct Summoner {
    pub name: String,
    pub region: Region,
    pub level: i32,
    pub profile_icon_id: i32,
    pub summoner_id: u64,
    pub account_id: u64,
}

impl Summoner {
    pub fn from_dto(region: Region, dto: SummonerDto) -> Self {
        Summoner {
            name: dto.name,
            region,
            level: dto.summoner_level,
            profile_icon_id: dto.profile_icon_id,
            summoner_id: dto.id,
            account_id: dto.account_id,
        }
    }
}
