//! User-facing strings shown by every adapter.

pub const VALIDATION_MESSAGE: &str = "Por favor, preencha todos os campos!";
pub const LAUNCH_ERROR_MESSAGE: &str = "Erro ao iniciar scraping";
pub const CONNECTIVITY_MESSAGE: &str = "Erro de conexão com a API";
pub const EMPTY_RESULT_MESSAGE: &str = "Nenhum resultado encontrado";
pub const DOWNLOAD_ERROR_MESSAGE: &str = "Erro ao baixar arquivo";
pub const UNKNOWN_ERROR_MESSAGE: &str = "Erro desconhecido";

pub const SITE_PLACEHOLDER: &str = "Selecione um site...";
pub const SITES_UNAVAILABLE: &str = "Erro ao carregar sites";

pub const SUBMIT_IDLE: &str = "Iniciar Scraping";
pub const SUBMIT_BUSY: &str = "Iniciando...";
pub const DOWNLOAD_IDLE: &str = "Baixar Excel";
pub const DOWNLOAD_BUSY: &str = "Baixando...";

pub const STATUS_PENDING: &str = "Aguardando...";
pub const STATUS_RUNNING: &str = "Coletando dados...";
pub const STATUS_COMPLETED: &str = "Concluído!";
pub const STATUS_ERROR: &str = "Erro!";
pub const DETAILS_DEFAULT: &str = "Processando...";

/// Shown for absent optional fields in result rows.
pub const NOT_AVAILABLE: &str = "N/A";
/// Link target used when an item has no link.
pub const LINK_PLACEHOLDER: &str = "#";
pub const LINK_LABEL: &str = "Ver Produto";
