use thiserror::Error;

#[derive(Error, Debug)]
pub enum TestError {
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    #[error("Fixture references user {0:?} which has not been inserted")]
    MissingFixture(String),
}
