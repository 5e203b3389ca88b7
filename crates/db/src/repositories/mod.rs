pub mod comment_repo;
pub mod comment_vote_repo;

pub use comment_repo::CommentRepo;
pub use comment_vote_repo::CommentVoteRepo;
