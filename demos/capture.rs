mod logging;

use std::path::Path;
use std::time::Duration;

use edsdk::event::CameraEvent;
use edsdk::property::{Capacity, SaveTo};
use edsdk::{Result, Sdk};

fn main() -> Result<()> {
  logging::setup();

  let sdk = Sdk::new()?;
  let camera = sdk.first_camera()?.expect("no camera connected");
  let mut session = camera.open_session()?;

  session.set_save_to(SaveTo::Host)?;
  session.set_capacity(Capacity::default())?;
  session.take_picture()?;

  while let Some(event) = session.wait_event(Duration::from_secs(10))? {
    if let CameraEvent::TransferRequest(item) = event {
      let name = item.info()?.file_name;
      item.download_to(Path::new(&name))?;
      println!("Downloaded image {}", name);
      break;
    }
  }

  Ok(())
}
