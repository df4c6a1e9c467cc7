//! Content models -> entities

use community_core::entities::{Comment, ContentRef, LikeState, Post, Reply};
use community_core::value_objects::{ContentKind, Snowflake};

use crate::models::{CommentModel, ContentRefModel, LikeStateModel, PostModel, ReplyModel};

impl From<PostModel> for Post {
    fn from(model: PostModel) -> Self {
        Post {
            id: Snowflake::new(model.id),
            group_id: Snowflake::new(model.group_id),
            author_id: Snowflake::new(model.author_id),
            title: model.title,
            content: model.content,
            is_hidden: model.is_hidden,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<CommentModel> for Comment {
    fn from(model: CommentModel) -> Self {
        Comment {
            id: Snowflake::new(model.id),
            post_id: Snowflake::new(model.post_id),
            author_id: Snowflake::new(model.author_id),
            content: model.content,
            is_hidden: model.is_hidden,
            created_at: model.created_at,
        }
    }
}

impl From<ReplyModel> for Reply {
    fn from(model: ReplyModel) -> Self {
        Reply {
            id: Snowflake::new(model.id),
            comment_id: Snowflake::new(model.comment_id),
            author_id: Snowflake::new(model.author_id),
            content: model.content,
            is_hidden: model.is_hidden,
            created_at: model.created_at,
        }
    }
}

pub fn content_ref(kind: ContentKind, model: ContentRefModel) -> ContentRef {
    ContentRef {
        kind,
        id: Snowflake::new(model.id),
        group_id: Snowflake::new(model.group_id),
        author_id: Snowflake::new(model.author_id),
        is_hidden: model.is_hidden,
    }
}

impl From<LikeStateModel> for (Snowflake, LikeState) {
    fn from(model: LikeStateModel) -> Self {
        (
            Snowflake::new(model.id),
            LikeState {
                liked: model.liked,
                like_count: model.like_count,
            },
        )
    }
}
