mod confirmation;
mod health;
mod response;
mod subscription;
mod weather;
