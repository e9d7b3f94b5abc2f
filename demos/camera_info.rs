use edsdk::{Result, Sdk};

fn main() -> Result<()> {
  let sdk = Sdk::new()?;

  let camera = match sdk.first_camera()? {
    Some(camera) => camera,
    None => {
      println!("No cameras found.");
      return Ok(());
    }
  };

  println!("==== DEVICE  ====\n{:#?}", camera.device_info()?);

  let session = camera.open_session()?;
  println!("==== PRODUCT ====\n{}", session.product_name()?);
  println!("==== BATTERY ====\n{}%", session.battery_level()?);

  Ok(())
}
