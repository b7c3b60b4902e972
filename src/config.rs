use secrecy::SecretBox;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub database_url: SecretBox<String>,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// コネクションプールの最大接続数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// ヘルスチェックで返すアプリケーション名
    #[serde(default = "default_app_title")]
    pub app_title: String,
    /// OpenAPI ドキュメントの説明文
    #[serde(default = "default_app_description")]
    pub app_description: String,
    /// true ならログを人間向けの形式で出力し、debug レベルまで出す
    #[serde(default)]
    pub debug: bool,
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_APP_TITLE: &str = "User Management API";
const DEFAULT_APP_DESCRIPTION: &str = "REST API for managing users";

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

fn default_app_title() -> String {
    DEFAULT_APP_TITLE.to_string()
}

fn default_app_description() -> String {
    DEFAULT_APP_DESCRIPTION.to_string()
}

impl Config {
    /// 環境変数から設定を読み込む（`.env` があれば先に反映）
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }
}
