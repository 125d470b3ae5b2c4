use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait, sea_query::Expr,
};

use crate::{
    entities::movie,
    error::{AppError, AppResult},
    models::{Movie, NewMovie},
};

#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// All movies by rating ascending. Unrated movies sort first, ties by id.
    pub async fn list_all(&self) -> AppResult<Vec<Movie>> {
        let movies = movie::Entity::find()
            .order_by_asc(movie::Column::Rating)
            .order_by_asc(movie::Column::Id)
            .all(&self.db)
            .await?;
        Ok(movies)
    }

    pub async fn find(&self, id: i32) -> AppResult<Option<Movie>> {
        Ok(movie::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn get(&self, id: i32) -> AppResult<Movie> {
        self.find(id).await?.ok_or_else(|| AppError::NotFound(format!("movie {id}")))
    }

    pub async fn insert(&self, new: NewMovie) -> AppResult<Movie> {
        let title = new.title.clone();
        let model = movie::ActiveModel {
            id: Default::default(),
            title: Set(new.title),
            year: Set(new.year),
            description: Set(new.description),
            rating: Set(None),
            ranking: Set(None),
            review: Set(None),
            img_url: Set(new.img_url),
        };

        model.insert(&self.db).await.map_err(|err| match AppError::from(err) {
            AppError::UniqueConstraintViolation(_) => AppError::UniqueConstraintViolation(title),
            other => other,
        })
    }

    pub async fn update(&self, movie: Movie) -> AppResult<Movie> {
        let id = movie.id;
        let model = movie::ActiveModel::from(movie).reset_all();
        match model.update(&self.db).await {
            Err(DbErr::RecordNotUpdated) => Err(AppError::NotFound(format!("movie {id}"))),
            result => Ok(result?),
        }
    }

    /// Returns whether a row was removed. A missing id is not an error.
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let res = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }

    pub async fn persist_rankings(&self, rankings: &[(i32, i32)]) -> AppResult<()> {
        if rankings.is_empty() {
            return Ok(());
        }

        let txn = self.db.begin().await?;

        for &(id, ranking) in rankings {
            movie::Entity::update_many()
                .col_expr(movie::Column::Ranking, Expr::value(ranking))
                .filter(movie::Column::Id.eq(id))
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;

        Ok(())
    }
}
