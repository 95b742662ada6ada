//! # murmur-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

// Re-export the service surface the API layer works against
pub use dto::{
    AcceptMessagesRequest, AcceptStatusResponse, DeleteAccountRequest, HealthResponse,
    InboxResponse, MessageResponse, ReadinessResponse, SendMessageRequest, SignInRequest,
    SignInResponse, SignUpRequest, UpdatedUserResponse, UserResponse, UsernameQuery,
    VerifyCodeRequest,
};
pub use services::{
    AccountService, InboxService, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult,
};
