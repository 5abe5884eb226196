//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use auth_service_lib::TokenResponse;
use domain::{
    Accompany, AccompanySort, AccompanyStatus, ConsumeStyle, Continent, Destination,
    DrinkingType, FoodRestriction, Gender, Mbti, Reply, SmokingType, TravelPreference,
    TravelPreferenceInput, TravelTheme, TravelType, UserDetailResponse, UserResponse, UserRole,
};

use crate::handlers::accompany_handler::AccompanyRequest;
use crate::handlers::auth_handler::{
    ChangePasswordRequest, PasswordChangeMailRequest, SignInRequest, SignUpRequest,
    ValidateEmailRequest,
};
use crate::handlers::reply_handler::{CreateReplyRequest, UpdateReplyRequest};
use crate::handlers::user_handler::UpdateProfileRequest;

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::auth_handler::sign_up,
        crate::handlers::auth_handler::sign_in,
        crate::handlers::auth_handler::validate_email,
        crate::handlers::auth_handler::request_password_change,
        crate::handlers::auth_handler::change_password,
        crate::handlers::auth_handler::refresh_token,
        crate::handlers::user_handler::get_current_user,
        crate::handlers::user_handler::get_user,
        crate::handlers::user_handler::update_profile,
        crate::handlers::user_handler::update_travel_preference,
        crate::handlers::user_handler::delete_current_user,
        crate::handlers::accompany_handler::list_accompanies,
        crate::handlers::accompany_handler::create_accompany,
        crate::handlers::accompany_handler::get_accompany,
        crate::handlers::accompany_handler::update_accompany,
        crate::handlers::accompany_handler::delete_accompany,
        crate::handlers::accompany_handler::close_accompany,
        crate::handlers::accompany_handler::like_accompany,
        crate::handlers::accompany_handler::unlike_accompany,
        crate::handlers::reply_handler::list_replies,
        crate::handlers::reply_handler::create_reply,
        crate::handlers::reply_handler::update_reply,
        crate::handlers::reply_handler::delete_reply,
        crate::handlers::reply_handler::like_reply,
        crate::handlers::reply_handler::unlike_reply,
    ),
    components(
        schemas(
            SignUpRequest,
            SignInRequest,
            ValidateEmailRequest,
            PasswordChangeMailRequest,
            ChangePasswordRequest,
            TokenResponse,
            UpdateProfileRequest,
            UserResponse,
            UserDetailResponse,
            UserRole,
            Gender,
            TravelPreference,
            TravelPreferenceInput,
            Mbti,
            TravelType,
            TravelTheme,
            ConsumeStyle,
            FoodRestriction,
            SmokingType,
            DrinkingType,
            AccompanyRequest,
            Accompany,
            AccompanyStatus,
            AccompanySort,
            Continent,
            Destination,
            CreateReplyRequest,
            UpdateReplyRequest,
            Reply,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Sign-up, sign-in and email confirmation"),
        (name = "Users", description = "Profiles and travel preferences"),
        (name = "Accompanies", description = "Trip-companion posts"),
        (name = "Replies", description = "Replies on posts"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
