use crate::channel::request::Request;
use crate::channel::transport::{Transport, UreqTransport};
use crate::channel::Channel;
use crate::config::Config;
use crate::error::ChannelError;

use super::endpoints::{ApiCategory, Region};
use super::models::*;

pub struct RiotApiClient<T: Transport = UreqTransport> {
    channel: Channel<T>,
}

impl RiotApiClient<UreqTransport> {
    pub fn new(config: Config) -> Result<Self, ChannelError> {
        Ok(RiotApiClient {
            channel: Channel::new(config)?,
        })
    }
}

impl<T: Transport> RiotApiClient<T> {
    pub fn with_channel(channel: Channel<T>) -> Self {
        RiotApiClient { channel }
    }

    pub fn channel(&self) -> &Channel<T> {
        &self.channel
    }

    pub fn get_summoner_by_id(&self, region: Region, summoner_id: &str) -> Result<Summoner, ChannelError> {
        self.get_summoner(region, "summoners", summoner_id)
    }

    pub fn get_summoner_by_account(&self, region: Region, account_id: &str) -> Result<Summoner, ChannelError> {
        self.get_summoner(region, "summoners/by-account", account_id)
    }

    pub fn get_summoner_by_name(&self, region: Region, summoner_name: &str) -> Result<Summoner, ChannelError> {
        let encoded = urlencoding::encode(summoner_name);
        self.get_summoner(region, "summoners/by-name", &encoded)
    }

    fn get_summoner(&self, region: Region, qualifier: &str, value: &str) -> Result<Summoner, ChannelError> {
        let mut request = Request::new(region, ApiCategory::Summoner)
            .path(qualifier)
            .path(value);

        let response = self.channel.dispatch(&mut request)?;
        let dto: SummonerDto = response.json()?;
        Ok(Summoner::from_dto(region, dto))
    }
}
