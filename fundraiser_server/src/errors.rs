use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use fundraiser_engine::{db_types::ValidationError, traits::ContributionDbError, PaymentFlowError};
use razorpay_tools::RazorpayApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Payload deserialization error")]
    CouldNotDeserializePayload,
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Invalid contribution details. {0}")]
    ValidationError(#[from] ValidationError),
    #[error("The payment gateway is unavailable. {0}")]
    GatewayUnavailable(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Payment signature verification failed.")]
    SignatureMismatch,
    #[error("The requested transition conflicts with the order's terminal state. {0}")]
    OrderConflict(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::CouldNotDeserializePayload => StatusCode::BAD_REQUEST,
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::SignatureMismatch => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::OrderConflict(_) => StatusCode::CONFLICT,
            Self::GatewayUnavailable(_) => StatusCode::BAD_GATEWAY,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<PaymentFlowError> for ServerError {
    fn from(e: PaymentFlowError) -> Self {
        match e {
            PaymentFlowError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            PaymentFlowError::ContributionAlreadyExists(id) => {
                Self::OrderConflict(format!("A contribution already exists for order {id}."))
            },
            PaymentFlowError::OrderNotFound(id) => Self::NoRecordFound(format!("No contribution for order {id}.")),
            PaymentFlowError::SignatureMismatch(_) => Self::SignatureMismatch,
            PaymentFlowError::OrderAlreadyFailed(id) => {
                Self::OrderConflict(format!("Order {id} has already failed."))
            },
            PaymentFlowError::OrderAlreadyPaid(id) => Self::OrderConflict(format!("Order {id} is already paid.")),
        }
    }
}

impl From<ContributionDbError> for ServerError {
    fn from(e: ContributionDbError) -> Self {
        match e {
            ContributionDbError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            ContributionDbError::ContributionAlreadyExists(id) => {
                Self::OrderConflict(format!("A contribution already exists for order {id}."))
            },
            ContributionDbError::ContributionNotFound(id) => {
                Self::NoRecordFound(format!("No contribution for order {id}."))
            },
        }
    }
}

impl From<RazorpayApiError> for ServerError {
    fn from(e: RazorpayApiError) -> Self {
        Self::GatewayUnavailable(e.to_string())
    }
}
