//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Running Redis instance
//! - Environment variables: DATABASE_URL, REDIS_URL, JWT_SECRET
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error, assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;

/// Owner creates a group and returns it
async fn create_group(
    server: &TestServer,
    owner: &AuthResponse,
    request: &CreateGroupRequest,
) -> GroupResponse {
    let response = server
        .post_auth("/groups", &owner.access_token, request)
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn join(server: &TestServer, member: &AuthResponse, group_id: &str) -> MembershipResponse {
    let response = server
        .post_empty(&format!("/groups/{group_id}/join"), &member.access_token)
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_account() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    let response = server.post("/auth/register", &request).await.unwrap();
    let registered: RegisterResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(registered.account.username, request.username);
    assert!(!registered.activation_required);
    assert_eq!(registered.account.is_active, Some(true));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    let response = server.post("/auth/register", &request).await.unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server.post("/auth/register", &request).await.unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();
}

#[tokio::test]
async fn test_login_and_refresh() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = server.sign_up().await.unwrap();
    assert_eq!(auth.token_type, "Bearer");

    let response = server
        .post(
            "/auth/refresh",
            &RefreshTokenRequest {
                refresh_token: auth.refresh_token.clone(),
            },
        )
        .await
        .unwrap();
    let refreshed: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(refreshed.account.id, auth.account.id);

    // Refresh tokens rotate
    let response = server
        .post(
            "/auth/refresh",
            &RefreshTokenRequest {
                refresh_token: auth.refresh_token,
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_login_wrong_password() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    let response = server.post("/auth/register", &request).await.unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let login = LoginRequest {
        email: request.email,
        password: "WrongPass123!".to_string(),
    };
    let response = server.post("/auth/login", &login).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = server.sign_up().await.unwrap();

    let response = server
        .post_auth(
            "/auth/logout",
            &auth.access_token,
            &LogoutRequest {
                refresh_token: auth.refresh_token.clone(),
                everywhere: false,
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .post(
            "/auth/refresh",
            &RefreshTokenRequest {
                refresh_token: auth.refresh_token,
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_requests_without_token_are_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/accounts/@me").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server.get_auth("/accounts/@me", "not-a-token").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Group and Membership Tests
// ============================================================================

#[tokio::test]
async fn test_public_group_join_is_immediate() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.sign_up().await.unwrap();
    let member = server.sign_up().await.unwrap();

    let group = create_group(&server, &owner, &CreateGroupRequest::public()).await;
    assert_eq!(group.owner_id, owner.account.id);
    assert_eq!(group.privacy, "public");

    let membership = join(&server, &member, &group.id).await;
    assert_eq!(membership.state, "active");
    assert!(membership.is_approved);

    let response = server
        .post_empty(&format!("/groups/{}/join", group.id), &member.access_token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "ALREADY_MEMBER");
}

#[tokio::test]
async fn test_private_group_request_and_approval() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.sign_up().await.unwrap();
    let member = server.sign_up().await.unwrap();
    let group = create_group(&server, &owner, &CreateGroupRequest::private()).await;

    let membership = join(&server, &member, &group.id).await;
    assert_eq!(membership.state, "pending");

    // Pending members cannot read a private group's posts
    let response = server
        .get_auth(&format!("/groups/{}/posts", group.id), &member.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    // Only admins approve
    let approve = format!("/groups/{}/members/{}/approve", group.id, member.account.id);
    let response = server.post_empty(&approve, &member.access_token).await.unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "NOT_GROUP_ADMIN");

    let response = server.post_empty(&approve, &owner.access_token).await.unwrap();
    let approved: MembershipResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(approved.state, "active");
    assert_eq!(approved.account_id, member.account.id);
}

#[tokio::test]
async fn test_suspension_toggles_and_owner_is_protected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.sign_up().await.unwrap();
    let member = server.sign_up().await.unwrap();
    let group = create_group(&server, &owner, &CreateGroupRequest::public()).await;
    join(&server, &member, &group.id).await;

    let suspension = format!("/groups/{}/members/{}/suspension", group.id, member.account.id);
    let response = server.post_empty(&suspension, &owner.access_token).await.unwrap();
    let suspended: MembershipResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(suspended.is_suspended);
    assert_eq!(suspended.state, "suspended");

    let response = server.post_empty(&suspension, &owner.access_token).await.unwrap();
    let restored: MembershipResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(restored.state, "active");

    let owner_suspension =
        format!("/groups/{}/members/{}/suspension", group.id, owner.account.id);
    let response = server
        .post_empty(&owner_suspension, &owner.access_token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "OWNER_PROTECTED");
}

// ============================================================================
// Content Tests
// ============================================================================

#[tokio::test]
async fn test_like_toggles_and_counts() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.sign_up().await.unwrap();
    let member = server.sign_up().await.unwrap();
    let group = create_group(&server, &owner, &CreateGroupRequest::public()).await;
    join(&server, &member, &group.id).await;

    let response = server
        .post_auth(
            &format!("/groups/{}/posts", group.id),
            &owner.access_token,
            &CreatePostRequest::unique(),
        )
        .await
        .unwrap();
    let post: PostResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(post.like_count, 0);

    let like = format!("/posts/{}/like", post.id);
    let response = server.post_empty(&like, &member.access_token).await.unwrap();
    let liked: LikeResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(liked.liked);
    assert_eq!(liked.like_count, 1);

    let response = server.post_empty(&like, &member.access_token).await.unwrap();
    let unliked: LikeResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!unliked.liked);
    assert_eq!(unliked.like_count, 0);
}

#[tokio::test]
async fn test_hidden_post_is_invisible_to_others() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.sign_up().await.unwrap();
    let member = server.sign_up().await.unwrap();
    let group = create_group(&server, &owner, &CreateGroupRequest::public()).await;
    join(&server, &member, &group.id).await;

    let response = server
        .post_auth(
            &format!("/groups/{}/posts", group.id),
            &member.access_token,
            &CreatePostRequest::unique(),
        )
        .await
        .unwrap();
    let post: PostResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_empty(&format!("/posts/{}/visibility", post.id), &member.access_token)
        .await
        .unwrap();
    let hidden: VisibilityResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(hidden.is_hidden);

    let stranger = server.sign_up().await.unwrap();
    let response = server
        .get_auth(&format!("/posts/{}", post.id), &stranger.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server
        .get_auth(&format!("/posts/{}", post.id), &member.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_author_deletes_post() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.sign_up().await.unwrap();
    let group = create_group(&server, &owner, &CreateGroupRequest::public()).await;

    let response = server
        .post_auth(
            &format!("/groups/{}/posts", group.id),
            &owner.access_token,
            &CreatePostRequest::unique(),
        )
        .await
        .unwrap();
    let post: PostResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(post.author_id, owner.account.id);

    let path = format!("/posts/{}", post.id);
    let response = server.delete_auth(&path, &owner.access_token).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get_auth(&path, &owner.access_token).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Poll Tests
// ============================================================================

#[tokio::test]
async fn test_vote_once_per_poll() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.sign_up().await.unwrap();
    let member = server.sign_up().await.unwrap();
    let group = create_group(&server, &owner, &CreateGroupRequest::public()).await;
    join(&server, &member, &group.id).await;

    let response = server
        .post_auth(
            &format!("/groups/{}/polls", group.id),
            &owner.access_token,
            &PollRequest::open_now(),
        )
        .await
        .unwrap();
    let poll: PollResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(poll.status, "open");
    assert_eq!(poll.choices.len(), 2);

    let vote = CastVoteRequest {
        choice_id: poll.choices[1].id.clone(),
    };
    let votes = format!("/polls/{}/votes", poll.id);

    let response = server.post_auth(&votes, &member.access_token, &vote).await.unwrap();
    let cast: VoteResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(cast.choice_id, vote.choice_id);

    let response = server.post_auth(&votes, &member.access_token, &vote).await.unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "ALREADY_VOTED");

    let response = server
        .get_auth(&format!("/polls/{}/results", poll.id), &owner.access_token)
        .await
        .unwrap();
    let results: PollResultsResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(results.total_votes, 1);
    assert_eq!(results.choices[1].votes, 1);
}

#[tokio::test]
async fn test_vote_requires_membership_and_open_window() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.sign_up().await.unwrap();
    let outsider = server.sign_up().await.unwrap();
    let group = create_group(&server, &owner, &CreateGroupRequest::public()).await;

    let response = server
        .post_auth(
            &format!("/groups/{}/polls", group.id),
            &owner.access_token,
            &PollRequest::upcoming(),
        )
        .await
        .unwrap();
    let poll: PollResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(poll.status, "upcoming");

    let vote = CastVoteRequest {
        choice_id: poll.choices[0].id.clone(),
    };
    let votes = format!("/polls/{}/votes", poll.id);

    let response = server.post_auth(&votes, &outsider.access_token, &vote).await.unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "NOT_ELIGIBLE");

    let response = server.post_auth(&votes, &owner.access_token, &vote).await.unwrap();
    let code = assert_error(response, StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .unwrap();
    assert_eq!(code, "VOTING_NOT_OPEN");
}

#[tokio::test]
async fn test_poll_is_locked_after_first_vote() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.sign_up().await.unwrap();
    let group = create_group(&server, &owner, &CreateGroupRequest::public()).await;

    let response = server
        .post_auth(
            &format!("/groups/{}/polls", group.id),
            &owner.access_token,
            &PollRequest::open_now(),
        )
        .await
        .unwrap();
    let poll: PollResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    let path = format!("/polls/{}", poll.id);

    // Editable until someone votes
    let response = server
        .patch_auth(&path, &owner.access_token, &PollRequest::open_now())
        .await
        .unwrap();
    let edited: PollResponse = assert_json(response, StatusCode::OK).await.unwrap();

    let vote = CastVoteRequest {
        choice_id: edited.choices[0].id.clone(),
    };
    let response = server
        .post_auth(&format!("{path}/votes"), &owner.access_token, &vote)
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .patch_auth(&path, &owner.access_token, &PollRequest::open_now())
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "POLL_LOCKED");
}

// ============================================================================
// Event Tests
// ============================================================================

#[tokio::test]
async fn test_event_rsvp_summary() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.sign_up().await.unwrap();
    let member = server.sign_up().await.unwrap();
    let group = create_group(&server, &owner, &CreateGroupRequest::public()).await;
    join(&server, &member, &group.id).await;

    let response = server
        .post_auth(
            &format!("/groups/{}/events", group.id),
            &owner.access_token,
            &CreateEventRequest::tomorrow(),
        )
        .await
        .unwrap();
    let event: EventResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(event.schedule, "upcoming");

    let rsvp = RsvpRequest {
        response: "yes".to_string(),
    };
    let response = server
        .put_auth(&format!("/events/{}/rsvp", event.id), &member.access_token, &rsvp)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .get_auth(&format!("/events/{}", event.id), &member.access_token)
        .await
        .unwrap();
    let detail: EventDetailResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(detail.my_response.as_deref(), Some("yes"));
    assert_eq!(detail.rsvp.yes, 1);
    // The owner has not answered
    assert_eq!(detail.rsvp.pending, 1);
}

#[tokio::test]
async fn test_only_admins_create_events() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.sign_up().await.unwrap();
    let member = server.sign_up().await.unwrap();
    let group = create_group(&server, &owner, &CreateGroupRequest::public()).await;
    join(&server, &member, &group.id).await;

    let response = server
        .post_auth(
            &format!("/groups/{}/events", group.id),
            &member.access_token,
            &CreateEventRequest::tomorrow(),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}
