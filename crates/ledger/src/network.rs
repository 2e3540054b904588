use std::fmt;
use std::str::FromStr;

pub const PUBLIC_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";
pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";
pub const FUTURENET_PASSPHRASE: &str = "Test SDF Future Network ; October 2022";
pub const LOCALNET_PASSPHRASE: &str = "Standalone Network ; February 2017";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network {
    Mainnet,
    #[default]
    Testnet,
    Futurenet,
    Localnet,
}

impl Network {
    pub fn passphrase(&self) -> &'static str {
        match self {
            Network::Mainnet => PUBLIC_PASSPHRASE,
            Network::Testnet => TESTNET_PASSPHRASE,
            Network::Futurenet => FUTURENET_PASSPHRASE,
            Network::Localnet => LOCALNET_PASSPHRASE,
        }
    }

    pub fn default_explorer_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://stellar.expert/explorer/public/tx/",
            Network::Testnet => "https://stellar.expert/explorer/testnet/tx/",
            Network::Futurenet => "https://stellar.expert/explorer/futurenet/tx/",
            Network::Localnet => "http://localhost:8000/tx/",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Network::Mainnet => "MAINNET",
            Network::Testnet => "TESTNET",
            Network::Futurenet => "FUTURENET",
            Network::Localnet => "LOCALNET",
        };
        f.write_str(name)
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MAINNET" | "PUBLIC" => Ok(Network::Mainnet),
            "TESTNET" => Ok(Network::Testnet),
            "FUTURENET" => Ok(Network::Futurenet),
            "LOCALNET" | "STANDALONE" => Ok(Network::Localnet),
            other => Err(format!("unknown network '{}'", other)),
        }
    }
}
